//! Integration tests for configuration management

use carbon_atlas::config::{Config, ConfigOverrides};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(
        !config.logging.level.is_empty(),
        "Default log level should not be empty"
    );
    assert!(
        !config.paths.emissions_csv.is_empty(),
        "Default emissions_csv should not be empty"
    );
    assert!(
        !config.paths.reports_dir.is_empty(),
        "Default reports_dir should not be empty"
    );
    assert_eq!(config.chart.default_metric, "co2");
    assert!(config.chart.width > 0 && config.chart.height > 0);
    assert!(config.chart.max_selected > 0);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[paths]
emissions_csv = "./data/co2.csv"
indicators_csv = "./data/wdi.csv"
map_geojson = "./maps/world.geojson"
reports_dir = "./reports"

[chart]
width = 900
height = 420
default_metric = "co2_per_capita"
default_countries = ["FRA", "DEU"]
max_selected = 5
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.emissions_csv, "./data/co2.csv");
    assert_eq!(config.paths.indicators_csv, "./data/wdi.csv");
    assert_eq!(config.paths.map_geojson, "./maps/world.geojson");
    assert_eq!(config.paths.reports_dir, "./reports");
    assert_eq!(config.chart.width, 900);
    assert_eq!(config.chart.height, 420);
    assert_eq!(config.chart.default_metric, "co2_per_capita");
    assert_eq!(config.chart.default_countries, vec!["FRA", "DEU"]);
    assert_eq!(config.chart.max_selected, 5);
}

#[test]
fn test_config_from_toml_partial() {
    let toml_str = r#"
[logging]
level = "error"

[paths]
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.paths.emissions_csv, "");
    assert_eq!(config.chart.width, 0);
    assert!(config.chart.default_countries.is_empty());
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$CARBON_ATLAS/test.log"

[paths]
map_geojson = "$CARBON_ATLAS/maps/world.geojson"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("carbonatlas"));
    assert!(!config.logging.file.contains("$CARBON_ATLAS"));
    assert!(config.paths.map_geojson.contains("carbonatlas"));
    assert!(config.paths.map_geojson.ends_with("world.geojson"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config
        .set("verbose", "true")
        .expect("Failed to set verbose");
    assert_eq!(config.get("verbose").unwrap(), "true");
    assert!(config.logging.verbose);

    config.set("max-selected", "4").expect("Failed to set max_selected");
    assert_eq!(config.chart.max_selected, 4);
    assert_eq!(config.get("max_selected").unwrap(), "4");

    config
        .set("default_countries", "fra, deu,,USA")
        .expect("Failed to set countries");
    assert_eq!(config.chart.default_countries, vec!["fra", "deu", "USA"]);
    assert_eq!(config.get("default-countries").unwrap(), "fra,deu,USA");

    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
    assert!(config.set("width", "wide").is_err());
    assert!(config.set("verbose", "maybe").is_err());
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("level", "debug").expect("Failed to set level");
    config.set("height", "999").expect("Failed to set height");
    config.set("default_countries", "BRA").expect("Failed to set countries");

    config
        .unset("level", &defaults)
        .expect("Failed to unset level");
    config
        .unset("height", &defaults)
        .expect("Failed to unset height");
    config
        .unset("default_countries", &defaults)
        .expect("Failed to unset countries");

    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(config.chart.height, defaults.chart.height);
    assert_eq!(
        config.chart.default_countries,
        defaults.chart.default_countries
    );
    assert!(config.unset("nope", &defaults).is_err());
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config.set("width", "1024").expect("Failed to set width");

    // Save to the scratch location instead of the user config dir
    let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
    fs::write(&config_file, toml_str).expect("Failed to write config");

    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    let loaded_config = Config::from_toml(&content).expect("Failed to parse loaded config");

    assert_eq!(loaded_config.logging.level, "info");
    assert_eq!(loaded_config.chart.width, 1024);
    assert_eq!(
        loaded_config.chart.default_countries,
        config.chart.default_countries
    );
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        emissions_csv: Some("./co2.csv".to_string()),
        indicators_csv: Some("./wdi.csv".to_string()),
        map_geojson: Some("./world.geojson".to_string()),
        reports_dir: Some("./custom_reports".to_string()),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.emissions_csv, "./co2.csv");
    assert_eq!(config.paths.indicators_csv, "./wdi.csv");
    assert_eq!(config.paths.map_geojson, "./world.geojson");
    assert_eq!(config.paths.reports_dir, "./custom_reports");
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let before = config.paths.emissions_csv.clone();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        ..Default::default()
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.paths.emissions_csv, before);
}

#[test]
fn test_config_display_format() {
    let config = Config::from_defaults();
    let display_str = format!("{config}");

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[paths]"));
    assert!(display_str.contains("[chart]"));

    assert!(display_str.contains("level"));
    assert!(display_str.contains("emissions_csv"));
    assert!(display_str.contains("max_selected"));
}

const DEFAULTS: &str = r#"
[logging]
level = "info"
file = "/tmp/carbonatlas.log"
verbose = false

[paths]
emissions_csv = "data/co2.csv"
reports_dir = "reports"

[chart]
width = 760
height = 380
default_countries = ["CHN", "USA"]
max_selected = 10
"#;

#[test]
fn test_defaults_fill_missing_keys() {
    let toml_str = r#"
[logging]
level = "error"

[paths]
emissions_csv = "mine.csv"
"#;

    let (config, changed) =
        Config::from_toml_with_defaults(toml_str, DEFAULTS).expect("Failed to parse minimal config");

    assert!(changed, "missing keys should be reported as added");
    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/tmp/carbonatlas.log");
    assert_eq!(config.paths.emissions_csv, "mine.csv");
    assert_eq!(config.paths.reports_dir, "reports");
    assert_eq!(config.chart.width, 760);
    assert_eq!(config.chart.max_selected, 10);
}

#[test]
fn test_cleared_settings_stay_cleared() {
    let toml_str = r#"
[logging]
level = "warn"
file = ""
verbose = false

[chart]
width = 500
default_countries = []
"#;

    let (config, _) = Config::from_toml_with_defaults(toml_str, DEFAULTS).unwrap();

    assert_eq!(config.logging.file, "", "an empty log file disables file logging");
    assert!(config.chart.default_countries.is_empty());
    assert_eq!(config.chart.width, 500);
    assert_eq!(config.chart.height, 380);
}

#[test]
fn test_set_empty_file_survives_reload() {
    let (mut config, _) = Config::from_toml_with_defaults(DEFAULTS, DEFAULTS).unwrap();
    config.set("file", "").unwrap();
    config.set("default_countries", "").unwrap();

    let saved = toml::to_string_pretty(&config).unwrap();
    let (reloaded, changed) = Config::from_toml_with_defaults(&saved, DEFAULTS).unwrap();

    assert!(!changed);
    assert_eq!(reloaded.logging.file, "");
    assert!(reloaded.chart.default_countries.is_empty());
}

#[test]
fn test_complete_file_adds_nothing() {
    let (_, changed) = Config::from_toml_with_defaults(DEFAULTS, DEFAULTS).unwrap();
    assert!(!changed);
}

#[test]
fn test_get_carbon_atlas_dir() {
    let dir = Config::get_carbon_atlas_dir();

    assert!(dir.to_string_lossy().contains("carbonatlas"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();

    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}
