//! Integration smoke tests for `carbon_atlas`

use carbon_atlas::config::Config;
use carbon_atlas::get_version;

#[test]
fn version_is_not_empty() {
    let v = get_version();
    assert!(!v.trim().is_empty());
}

#[test]
fn embedded_defaults_parse() {
    let config = Config::from_defaults();
    assert!(!config.logging.level.is_empty());
    assert!(!config.paths.emissions_csv.is_empty());
    assert!(config.chart.width > 0 && config.chart.height > 0);
    assert!(config.chart.max_selected > 0);
    assert!(config.chart.default_metric.parse::<carbon_atlas::core::data::EmissionMetric>().is_ok());
}
