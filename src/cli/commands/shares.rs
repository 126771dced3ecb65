//! Shares command handler

use super::{load_datasets, print_summary};
use carbon_atlas::config::Config;
use carbon_atlas::core::chart::axis::format_value;
use carbon_atlas::core::data::{Datasets, StackedYear};
use carbon_atlas::{debug, warn};

/// Run the shares command.
pub fn run(country: &str, year: Option<i32>, config: &Config) -> Result<(), String> {
    let data = load_datasets(config)?;
    let found = data
        .emissions
        .require_country(country)
        .map_err(|e| format!("✗ {e} (run `carbonatlas list countries`)"))?;

    let mix = source_mix(&data, &found.key, year).ok_or_else(|| {
        warn!("No source breakdown for {} ({year:?})", found.key);
        match year {
            Some(y) => format!("✗ No source breakdown for {} in {y}", found.name),
            None => format!("✗ No source breakdown for {}", found.name),
        }
    })?;
    debug!("Source mix: {mix:?}");

    let mut lines: Vec<(&str, String)> = mix
        .segments
        .iter()
        .map(|s| {
            (
                s.label.as_str(),
                format!("{:>10} Mt  {:>5.1}%", format_value(s.value), s.percent),
            )
        })
        .collect();
    lines.push(("Total", format!("{:>10} Mt", format_value(mix.total()))));
    print_summary(&format!("{} {}", found.name, mix.year), &lines);
    Ok(())
}

/// Source mix in `year`, or in the latest year that has one
fn source_mix(data: &Datasets, key: &str, year: Option<i32>) -> Option<StackedYear> {
    match year {
        Some(y) => data.emissions.source_mix(key, y),
        None => {
            let range = data.emissions.year_range()?;
            data.emissions.source_mix_series(key, &range).pop()
        }
    }
}
