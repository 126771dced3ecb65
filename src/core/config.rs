//! Configuration module for `carbon-atlas`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

const DIR_VARIABLE: &str = "$CARBON_ATLAS";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Input and output locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// CO₂ emissions CSV
    #[serde(default)]
    pub emissions_csv: String,
    /// World Bank indicators CSV (optional)
    #[serde(default)]
    pub indicators_csv: String,
    /// Country outlines as GeoJSON (optional)
    #[serde(default)]
    pub map_geojson: String,
    /// Directory for rendered dashboards
    #[serde(default)]
    pub reports_dir: String,
}

/// Chart defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Chart width in pixels
    #[serde(default)]
    pub width: u32,
    /// Chart height in pixels
    #[serde(default)]
    pub height: u32,
    /// Emissions metric shown when none is given
    #[serde(default)]
    pub default_metric: String,
    /// Countries selected when none are given
    #[serde(default)]
    pub default_countries: Vec<String>,
    /// Maximum number of selected countries
    #[serde(default)]
    pub max_selected: usize,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Chart settings
    #[serde(default)]
    pub chart: ChartConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override emissions CSV path
    pub emissions_csv: Option<String>,
    /// Override indicators CSV path
    pub indicators_csv: Option<String>,
    /// Override GeoJSON path
    pub map_geojson: Option<String>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
}

/// Copy keys that `defaults` has and `target` lacks, recursing into tables.
///
/// Keys already present are kept as written, including empty values.
fn merge_missing_keys(target: &mut toml::Table, defaults: &toml::Table) -> bool {
    let mut changed = false;
    for (key, default) in defaults {
        if !target.contains_key(key) {
            target.insert(key.clone(), default.clone());
            changed = true;
            continue;
        }
        if let (Some(toml::Value::Table(inner)), toml::Value::Table(inner_default)) =
            (target.get_mut(key), default)
        {
            changed |= merge_missing_keys(inner, inner_default);
        }
    }
    changed
}

impl Config {
    /// Get the `$CARBON_ATLAS` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/carbonatlas`
    /// - macOS: `~/Library/Application Support/carbonatlas`
    /// - Windows: `%APPDATA%\carbonatlas`
    #[must_use]
    pub fn get_carbon_atlas_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("carbonatlas")
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Only non-`None` values replace config values; the file on disk is not
    /// touched.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(path) = &overrides.emissions_csv {
            self.paths.emissions_csv.clone_from(path);
        }
        if let Some(path) = &overrides.indicators_csv {
            self.paths.indicators_csv.clone_from(path);
        }
        if let Some(path) = &overrides.map_geojson {
            self.paths.map_geojson.clone_from(path);
        }
        if let Some(dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(dir);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds,
    /// inside [`get_carbon_atlas_dir`](Self::get_carbon_atlas_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_carbon_atlas_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$CARBON_ATLAS` to the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_carbon_atlas_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Expands `$CARBON_ATLAS` in path values. Missing fields use their serde
    /// defaults (empty strings, zero, false).
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Self = toml::from_str(toml_str)?;
        Ok(config.expanded())
    }

    /// Initialize config from a user TOML string, adding every key that
    /// `defaults_str` has and the user file lacks
    ///
    /// Keys present in the user file win even when empty, so a setting
    /// cleared with `config set file ""` stays cleared.
    ///
    /// # Returns
    ///
    /// The config and whether any key was added
    ///
    /// # Errors
    ///
    /// Returns an error if either string cannot be parsed or the merged
    /// table doesn't match the expected schema
    pub fn from_toml_with_defaults(
        toml_str: &str,
        defaults_str: &str,
    ) -> Result<(Self, bool), toml::de::Error> {
        let mut table: toml::Table = toml::from_str(toml_str)?;
        let defaults: toml::Table = toml::from_str(defaults_str)?;
        let changed = merge_missing_keys(&mut table, &defaults);
        let config: Self = toml::Value::Table(table).try_into()?;
        Ok((config.expanded(), changed))
    }

    fn expanded(mut self) -> Self {
        self.logging.file = Self::expand_variables(&self.logging.file);
        self.paths.emissions_csv = Self::expand_variables(&self.paths.emissions_csv);
        self.paths.indicators_csv = Self::expand_variables(&self.paths.indicators_csv);
        self.paths.map_geojson = Self::expand_variables(&self.paths.map_geojson);
        self.paths.reports_dir = Self::expand_variables(&self.paths.reports_dir);
        self
    }

    /// Load configuration from embedded defaults
    ///
    /// Debug builds use `DefaultCLIConfigDebug.toml`, release builds
    /// `DefaultCLIConfigRelease.toml`. An unparsable embedded file falls back
    /// to an empty configuration.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).unwrap_or_default()
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// An existing file gains any default keys it lacks and is re-saved
    /// when that added something. On first run the defaults are written
    /// out. Any read or parse error falls back to the defaults.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok((config, changed)) =
                    Self::from_toml_with_defaults(&content, CONFIG_DEFAULTS)
                {
                    if changed {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized, the directory
    /// cannot be created, or the file cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Keys are field names without their section (`level`, `emissions_csv`,
    /// `width`, ...); `-` may be used in place of `_`. List values are joined
    /// with commas.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key.replace('-', "_").as_str() {
            "level" => self.logging.level.clone(),
            "file" => self.logging.file.clone(),
            "verbose" => self.logging.verbose.to_string(),
            "emissions_csv" => self.paths.emissions_csv.clone(),
            "indicators_csv" => self.paths.indicators_csv.clone(),
            "map_geojson" => self.paths.map_geojson.clone(),
            "reports_dir" => self.paths.reports_dir.clone(),
            "width" => self.chart.width.to_string(),
            "height" => self.chart.height.to_string(),
            "default_metric" => self.chart.default_metric.clone(),
            "default_countries" => self.chart.default_countries.join(","),
            "max_selected" => self.chart.max_selected.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config only; call [`save()`](Config::save) to
    /// persist. `default_countries` takes a comma-separated list.
    ///
    /// # Errors
    /// Returns an error for an unknown key or a value of the wrong type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key.replace('-', "_").as_str() {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "emissions_csv" => self.paths.emissions_csv = value.to_string(),
            "indicators_csv" => self.paths.indicators_csv = value.to_string(),
            "map_geojson" => self.paths.map_geojson = value.to_string(),
            "reports_dir" => self.paths.reports_dir = value.to_string(),
            "width" => self.chart.width = parse_number(key, value)?,
            "height" => self.chart.height = parse_number(key, value)?,
            "default_metric" => self.chart.default_metric = value.to_string(),
            "default_countries" => {
                self.chart.default_countries = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "max_selected" => self.chart.max_selected = parse_number(key, value)?,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to its default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        let default = defaults
            .get(key)
            .ok_or_else(|| format!("Unknown config key: '{key}'"))?;
        self.set(key, &default)
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds when there is no file.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| format!("Invalid number for '{key}': '{value}'"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  emissions_csv = \"{}\"", self.paths.emissions_csv)?;
        writeln!(f, "  indicators_csv = \"{}\"", self.paths.indicators_csv)?;
        writeln!(f, "  map_geojson = \"{}\"", self.paths.map_geojson)?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        writeln!(f, "\n[chart]")?;
        writeln!(f, "  width = {}", self.chart.width)?;
        writeln!(f, "  height = {}", self.chart.height)?;
        writeln!(f, "  default_metric = \"{}\"", self.chart.default_metric)?;
        writeln!(
            f,
            "  default_countries = [{}]",
            self.chart
                .default_countries
                .iter()
                .map(|c| format!("\"{c}\""))
                .collect::<Vec<_>>()
                .join(", ")
        )?;
        writeln!(f, "  max_selected = {}", self.chart.max_selected)?;

        Ok(())
    }
}
