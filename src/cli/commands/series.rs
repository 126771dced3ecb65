//! Series command handler
//!
//! Prints the selected metric (or indicator) per country and year, or writes
//! it to a long-format CSV file.

use super::{build_selection, load_datasets, print_summary};
use crate::args::SelectionArgs;
use carbon_atlas::config::Config;
use carbon_atlas::core::chart::axis::format_value;
use carbon_atlas::core::dashboard::Dashboard;
use carbon_atlas::core::data::Series;
use carbon_atlas::{error, info};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct Row<'a> {
    key: &'a str,
    country: &'a str,
    year: i32,
    value: f64,
}

/// Run the series command.
pub fn run(args: &SelectionArgs, output: Option<&Path>, config: &Config) -> Result<(), String> {
    let data = load_datasets(config)?;
    let selection = build_selection(args, &data, config)?;
    let dashboard = Dashboard::new(&data, &selection);

    let (title, series) = match dashboard.indicator_name() {
        Some(name) => (name, dashboard.indicator_series()),
        None => (
            selection.metric().label().to_string(),
            dashboard.metric_series(),
        ),
    };

    if let Some(path) = output {
        let rows = write_csv(path, &series).map_err(|e| {
            error!("Failed to write {}: {e}", path.display());
            format!("✗ Failed to write {}: {e}", path.display())
        })?;
        info!("Wrote {rows} rows to {}", path.display());
        print_summary(
            "Summary",
            &[
                ("Series:", title),
                ("Countries:", series.len().to_string()),
                ("Rows:", rows.to_string()),
            ],
        );
        println!("\n✓ Series written: {}", path.display());
    } else {
        println!("\n=== {title} ===\n");
        print!("{}", table(&series));
    }
    Ok(())
}

/// Write one CSV row per point; returns the number of rows
fn write_csv(path: &Path, series: &[Series]) -> Result<usize, csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut rows = 0;
    for s in series {
        for point in &s.points {
            writer.serialize(Row {
                key: &s.key,
                country: &s.label,
                year: point.year,
                value: point.value,
            })?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

/// Plain-text year by country table
fn table(series: &[Series]) -> String {
    let years: BTreeSet<i32> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.year))
        .collect();
    if years.is_empty() {
        return "No data for this selection\n".to_string();
    }

    let mut out = format!("{:<6}", "Year");
    for s in series {
        let _ = write!(out, "{:>14}", s.key);
    }
    out.push('\n');
    for year in years {
        let _ = write!(out, "{year:<6}");
        for s in series {
            let cell = s.value_at(year).map(format_value).unwrap_or_default();
            let _ = write!(out, "{cell:>14}");
        }
        out.push('\n');
    }
    out
}
