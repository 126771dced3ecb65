//! List command handler

use super::load_datasets;
use crate::args::ListTarget;
use carbon_atlas::config::Config;
use carbon_atlas::core::data::{CountryRef, EmissionMetric};

/// Run the list command.
pub fn run(target: ListTarget, filter: Option<&str>, config: &Config) -> Result<(), String> {
    let entries = match target {
        ListTarget::Metrics => metric_entries(),
        ListTarget::Countries => country_entries(&load_datasets(config)?.emissions.countries()),
        ListTarget::Aggregates => {
            country_entries(&load_datasets(config)?.emissions.aggregates())
        }
        ListTarget::Indicators => load_datasets(config)?
            .indicators
            .indicators()
            .into_iter()
            .map(|i| (i.code, i.name))
            .collect(),
    };

    let shown = filtered(entries, filter);
    if shown.is_empty() {
        println!("No entries");
        return Ok(());
    }
    let width = shown.iter().map(|(code, _)| code.len()).max().unwrap_or(0);
    for (code, name) in &shown {
        println!("{code:<width$}  {name}");
    }
    Ok(())
}

fn metric_entries() -> Vec<(String, String)> {
    EmissionMetric::ALL
        .into_iter()
        .map(|m| (m.column().to_string(), format!("{} ({})", m.label(), m.unit())))
        .collect()
}

fn country_entries(countries: &[CountryRef]) -> Vec<(String, String)> {
    countries
        .iter()
        .map(|c| (c.key.clone(), c.name.clone()))
        .collect()
}

/// Keep entries whose code or name contains `filter` (case-insensitive)
fn filtered(entries: Vec<(String, String)>, filter: Option<&str>) -> Vec<(String, String)> {
    let Some(needle) = filter.map(str::to_lowercase).filter(|f| !f.is_empty()) else {
        return entries;
    };
    entries
        .into_iter()
        .filter(|(code, name)| {
            code.to_lowercase().contains(&needle) || name.to_lowercase().contains(&needle)
        })
        .collect()
}
