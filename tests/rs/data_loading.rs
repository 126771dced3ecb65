//! Integration tests for dataset loading against the bundled samples

use carbon_atlas::core::data::{
    load_emissions, load_indicators, parse_emissions, Datasets, EmissionMetric,
};
use carbon_atlas::core::error::DataError;
use std::path::Path;

const EMISSIONS: &str = "samples/data/co2_sample.csv";
const INDICATORS: &str = "samples/data/wdi_sample.csv";

#[test]
fn test_load_emissions_sample() {
    let table = load_emissions(EMISSIONS).expect("sample emissions should load");

    // 6 countries and 2 aggregates over 5 years; blank country and bad year dropped
    assert_eq!(table.len(), 40);
    assert_eq!(table.skipped(), 2);
    assert_eq!(table.year_range(), Some(2000..=2020));

    let countries: Vec<String> = table.countries().into_iter().map(|c| c.key).collect();
    assert_eq!(countries, ["CHL", "CHN", "FRA", "DEU", "IND", "USA"]);

    let aggregates: Vec<String> = table.aggregates().into_iter().map(|c| c.name).collect();
    assert_eq!(aggregates, ["Europe", "World"]);
}

#[test]
fn test_emissions_lookups() {
    let table = load_emissions(EMISSIONS).unwrap();

    let germany = table.resolve_country("germany").expect("Germany resolves by name");
    assert_eq!(germany.key, "DEU");
    assert_eq!(table.resolve_country("owid_wrl").unwrap().name, "World");
    assert_eq!(table.resolve_country("Europe").unwrap().key, "Europe");
    assert!(table.resolve_country("Atlantis").is_none());

    let series = table.series("DEU", EmissionMetric::Co2);
    assert_eq!(series.label, "Germany");
    assert_eq!(series.len(), 5);
    assert_eq!(series.value_at(2020), Some(640.0));
    assert_eq!(series.peak().map(|p| p.year), Some(2000));

    let values = table.values_for_year(2020, EmissionMetric::Co2);
    assert_eq!(values.len(), 6);
    assert_eq!(values.get("CHN"), Some(&10900.0));
    assert!(!values.contains_key("OWID_WRL"));
}

#[test]
fn test_source_mix_from_sample() {
    let table = load_emissions(EMISSIONS).unwrap();

    let mix = table.source_mix("DEU", 2020).expect("Germany has sources in 2020");
    let labels: Vec<&str> = mix.segments.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["Coal", "Oil", "Gas", "Cement", "Flaring", "Other industry"]);
    assert!((mix.total() - 640.0).abs() < 1e-9);
    assert!((mix.segments[0].percent - 40.0).abs() < 1e-9);
    let percent_sum: f64 = mix.segments.iter().map(|s| s.percent).sum();
    assert!((percent_sum - 100.0).abs() < 1e-9);

    // Chile has no source columns in 2000
    assert!(table.source_mix("CHL", 2000).is_none());
    assert_eq!(table.source_mix_series("CHL", &(2000..=2020)).len(), 4);
}

#[test]
fn test_load_indicators_sample() {
    let table = load_indicators(INDICATORS).expect("sample indicators should load");

    let codes: Vec<String> = table.indicators().into_iter().map(|i| i.code).collect();
    assert_eq!(codes, ["EG.ELC.ACCS.ZS", "NY.GDP.PCAP.CD", "EG.FEC.RNEW.ZS"]);

    let gdp = table.resolve_indicator("gdp per capita").expect("substring match");
    assert_eq!(gdp.code, "NY.GDP.PCAP.CD");
    assert_eq!(
        table.resolve_indicator("ny.gdp.pcap.cd").map(|i| i.name),
        Some("GDP per capita (current US$)".to_string())
    );
    assert!(table.resolve_indicator("inflation").is_none());

    let series = table.series("DEU", "NY.GDP.PCAP.CD");
    assert_eq!(series.label, "Germany");
    assert_eq!(series.value_at(2020), Some(46208.0));

    // Blank and ".." cells are missing
    assert_eq!(table.series("DEU", "EG.FEC.RNEW.ZS").len(), 4);
    assert_eq!(table.series("CHL", "EG.ELC.ACCS.ZS").len(), 3);
    assert!(table.series("DEU", "EG.ELC.ACCS.ZS").is_empty());
}

#[test]
fn test_datasets_load() {
    let data = Datasets::load(Path::new(EMISSIONS), Some(Path::new(INDICATORS))).unwrap();
    assert_eq!(data.year_range(), Some(2000..=2020));
    assert!(!data.indicators.is_empty());

    let emissions_only = Datasets::load(Path::new(EMISSIONS), None).unwrap();
    assert!(emissions_only.indicators.is_empty());
}

#[test]
fn test_missing_file_reports_path() {
    let err = load_emissions("samples/data/does_not_exist.csv").unwrap_err();
    assert!(matches!(err, DataError::Io { .. }));
    assert!(err.to_string().contains("does_not_exist.csv"));
}

#[test]
fn test_missing_required_column() {
    let err = parse_emissions("nation,year,co2\nChile,2000,50\n".as_bytes()).unwrap_err();
    assert!(matches!(err, DataError::MissingColumn(ref c) if c == "country"));
}
