//! CLI command handlers for `carbonatlas`.
//!
//! Each command is implemented in its own submodule. The helpers here load
//! the configured datasets and turn selection flags into a [`Selection`].

pub mod config;
pub mod dashboard;
pub mod list;
pub mod series;
pub mod shares;

use crate::args::SelectionArgs;
use carbon_atlas::config::Config;
use carbon_atlas::core::chart::WorldMap;
use carbon_atlas::core::dashboard::{Event, Selection};
use carbon_atlas::core::data::{Datasets, EmissionMetric};
use carbon_atlas::{debug, error, info, warn};
use std::path::{Path, PathBuf};

/// Datasets plus optional map geometry
pub struct Loaded {
    pub data: Datasets,
    pub map: Option<WorldMap>,
}

/// Configured path, or `None` when unset or missing on disk
fn optional_path(value: &str, what: &str) -> Option<PathBuf> {
    if value.is_empty() {
        debug!("No {what} configured");
        return None;
    }
    let path = PathBuf::from(value);
    if path.exists() {
        Some(path)
    } else {
        warn!("{what} not found at {}, skipping", path.display());
        None
    }
}

/// Load the emissions CSV (required) and the indicator CSV (optional)
pub fn load_datasets(config: &Config) -> Result<Datasets, String> {
    if config.paths.emissions_csv.is_empty() {
        return Err("✗ No emissions CSV configured (use --emissions or `config set emissions_csv`)".to_string());
    }
    let emissions = Path::new(&config.paths.emissions_csv);
    let indicators = optional_path(&config.paths.indicators_csv, "Indicators CSV");

    let data = Datasets::load(emissions, indicators.as_deref()).map_err(|e| {
        error!("Failed to load datasets: {e}");
        format!("✗ Failed to load data: {e}")
    })?;

    info!(
        "Loaded {} emission rows ({} skipped) and {} indicator observations",
        data.emissions.len(),
        data.emissions.skipped(),
        data.indicators.len()
    );
    Ok(data)
}

/// Load datasets and, when configured, the map geometry
pub fn load_all(config: &Config) -> Result<Loaded, String> {
    let data = load_datasets(config)?;
    let map = match optional_path(&config.paths.map_geojson, "Map GeoJSON") {
        Some(path) => Some(WorldMap::load_geojson(&path).map_err(|e| {
            error!("Failed to load map {}: {e}", path.display());
            format!("✗ Failed to load map {}: {e}", path.display())
        })?),
        None => None,
    };
    Ok(Loaded { data, map })
}

/// Resolve a country name or code to its selection key.
///
/// Unknown countries fall back to the upper-cased input so they still show
/// up as an empty series.
pub fn resolve_country(data: &Datasets, query: &str) -> String {
    if let Some(country) = data.emissions.resolve_country(query) {
        return country.key;
    }
    if let Some(country) = data
        .indicators
        .countries()
        .into_iter()
        .find(|c| c.key.eq_ignore_ascii_case(query) || c.name.eq_ignore_ascii_case(query))
    {
        return country.key;
    }
    warn!("Unknown country '{query}', it will be shown without data");
    query.trim().to_ascii_uppercase()
}

/// Build a selection from CLI flags, falling back to config defaults
pub fn build_selection(
    args: &SelectionArgs,
    data: &Datasets,
    config: &Config,
) -> Result<Selection, String> {
    let bounds = data
        .year_range()
        .ok_or_else(|| "✗ No data rows loaded".to_string())?;
    let mut selection = Selection::new(bounds, config.chart.max_selected);

    let metric_name = args
        .metric
        .as_deref()
        .unwrap_or(config.chart.default_metric.as_str());
    let metric: EmissionMetric = metric_name
        .parse()
        .map_err(|e| format!("✗ {e} (run `carbonatlas list metrics`)"))?;
    selection.apply(Event::SetMetric(metric));

    let countries = if args.countries.is_empty() {
        &config.chart.default_countries
    } else {
        &args.countries
    };
    for query in countries.iter().filter(|q| !q.trim().is_empty()) {
        let key = resolve_country(data, query);
        if !selection.is_selected(&key) {
            selection.apply(Event::ToggleCountry(key));
        }
    }

    if let Some(query) = &args.indicator {
        let indicator = data
            .indicators
            .require_indicator(query)
            .map_err(|e| format!("✗ {e} (run `carbonatlas list indicators`)"))?;
        selection.apply(Event::SetIndicator(Some(indicator.code)));
    }

    if args.from.is_some() || args.to.is_some() {
        let range = selection.range().clone();
        selection.apply(Event::SetRange(
            args.from.unwrap_or(*range.start()),
            args.to.unwrap_or(*range.end()),
        ));
    }
    if let Some(year) = args.year {
        selection.apply(Event::SetYear(year));
    }
    if args.indexed {
        selection.apply(Event::SetIndexed(true));
    }
    if let Some(query) = &args.focus {
        selection.apply(Event::Focus(resolve_country(data, query)));
    }

    debug!("Selection: {selection:?}");
    Ok(selection)
}

/// Print a titled block of label/value lines
pub fn print_summary(title: &str, lines: &[(&str, String)]) {
    println!("\n=== {title} ===");
    let width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in lines {
        println!("{label:<width$}  {value}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbon_atlas::core::data::{EmissionRecord, EmissionsTable};

    fn datasets() -> Datasets {
        let records = [2000, 2010, 2020]
            .into_iter()
            .flat_map(|year| {
                [
                    EmissionRecord::new("Germany", Some("DEU".into()), year)
                        .with(EmissionMetric::Co2, 800.0),
                    EmissionRecord::new("World", Some("OWID_WRL".into()), year)
                        .with(EmissionMetric::Co2, 30000.0),
                ]
            })
            .collect();
        Datasets {
            emissions: EmissionsTable::from_records(records),
            ..Datasets::default()
        }
    }

    #[test]
    fn test_resolve_country() {
        let data = datasets();
        assert_eq!(resolve_country(&data, "germany"), "DEU");
        assert_eq!(resolve_country(&data, "World"), "OWID_WRL");
        assert_eq!(resolve_country(&data, "atl"), "ATL");
    }

    #[test]
    fn test_build_selection_uses_config_defaults() {
        let data = datasets();
        let mut config = Config::from_defaults();
        config.chart.default_countries = vec!["Germany".into(), "DEU".into()];
        config.chart.default_metric = "co2".into();

        let selection = build_selection(&SelectionArgs::default(), &data, &config).unwrap();
        assert_eq!(selection.countries(), ["DEU"]);
        assert_eq!(selection.year(), 2020);
        assert_eq!(selection.range(), &(2000..=2020));
    }

    #[test]
    fn test_build_selection_flags() {
        let data = datasets();
        let config = Config::from_defaults();
        let args = SelectionArgs {
            countries: vec!["World".into()],
            metric: Some("co2-per-capita".into()),
            from: Some(2010),
            year: Some(1990),
            ..SelectionArgs::default()
        };
        let selection = build_selection(&args, &data, &config).unwrap();
        assert_eq!(selection.countries(), ["OWID_WRL"]);
        assert_eq!(selection.metric(), EmissionMetric::Co2PerCapita);
        assert_eq!(selection.range(), &(2010..=2020));
        assert_eq!(selection.year(), 2000);
    }

    #[test]
    fn test_build_selection_errors() {
        let config = Config::from_defaults();
        let args = SelectionArgs {
            metric: Some("methane".into()),
            ..SelectionArgs::default()
        };
        assert!(build_selection(&args, &datasets(), &config).is_err());
        assert!(build_selection(&SelectionArgs::default(), &Datasets::default(), &config).is_err());

        let args = SelectionArgs {
            indicator: Some("GDP".into()),
            ..SelectionArgs::default()
        };
        let err = build_selection(&args, &datasets(), &config).unwrap_err();
        assert!(err.starts_with("✗ unknown indicator: 'GDP'"));
    }
}
