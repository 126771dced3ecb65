//! CLI argument definitions for `carbonatlas`

use clap::{builder::BoolishValueParser, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use carbon_atlas::config::ConfigOverrides;
use carbon_atlas::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level`
/// for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

/// What the `list` command prints
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum ListTarget {
    /// Countries with an ISO code
    Countries,
    /// Regions and other aggregates
    Aggregates,
    /// Emissions metrics
    Metrics,
    /// World Bank indicators
    Indicators,
}

/// Country, year and measure selection shared by several commands
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Countries by ISO code or name (repeatable or comma-separated);
    /// defaults to config `default_countries`
    #[arg(short = 'c', long = "country", value_name = "COUNTRY", value_delimiter = ',')]
    pub countries: Vec<String>,

    /// Emissions metric column (e.g. `co2`, `co2_per_capita`); defaults to config `default_metric`
    #[arg(short = 'm', long, value_name = "METRIC")]
    pub metric: Option<String>,

    /// World Bank indicator code or name
    #[arg(short = 'i', long, value_name = "INDICATOR")]
    pub indicator: Option<String>,

    /// Year shown on the map and in the source mix (default: latest)
    #[arg(short = 'y', long, value_name = "YEAR")]
    pub year: Option<i32>,

    /// First year of the line charts
    #[arg(long, value_name = "YEAR")]
    pub from: Option<i32>,

    /// Last year of the line charts
    #[arg(long, value_name = "YEAR")]
    pub to: Option<i32>,

    /// Show line charts as an index (first year = 100)
    #[arg(long)]
    pub indexed: bool,

    /// Country whose emission sources are shown (default: last selected)
    #[arg(long, value_name = "COUNTRY")]
    pub focus: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `emissions_csv`, `width`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set; an empty string clears the setting
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Render a dashboard of line charts, source mix and world map.
    Dashboard {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output format: html, svg (one file per chart) or markdown (md)
        #[arg(short, long, value_name = "FORMAT", default_value = "html")]
        format: String,

        /// Output path (a directory for svg); defaults to the config `reports_dir`
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Map projection: equirectangular or mercator
        #[arg(long, value_name = "PROJECTION", default_value = "equirectangular")]
        projection: String,

        /// Draw the source mix as shares of 100%
        #[arg(long)]
        percent: bool,
    },
    /// Print a metric or indicator series, or export it as CSV.
    Series {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Write long-format CSV (key,country,year,value) instead of printing
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print the emission source mix of a country.
    Shares {
        /// Country by ISO code or name
        #[arg(value_name = "COUNTRY")]
        country: String,

        /// Year (default: latest year with source data)
        #[arg(short = 'y', long, value_name = "YEAR")]
        year: Option<i32>,
    },
    /// List countries, aggregates, metrics or indicators.
    List {
        /// What to list
        #[arg(value_enum, value_name = "WHAT")]
        target: ListTarget,

        /// Only show entries whose name or code contains this text
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "carbonatlas",
    about = "Explore CO₂ emissions and development indicators as charts and maps",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Emissions CSV to load
    #[arg(long = "emissions", value_name = "FILE")]
    pub emissions: Option<PathBuf>,

    /// World Bank indicators CSV to load
    #[arg(long = "indicators", value_name = "FILE")]
    pub indicators: Option<PathBuf>,

    /// GeoJSON country outlines to load
    #[arg(long = "map", value_name = "FILE")]
    pub map: Option<PathBuf>,

    /// Override config reports directory
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

fn path_string(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().to_string())
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `None` means no override; the overrides apply to this run only.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: path_string(self.config_log_file.as_ref()),
            verbose: self.config_verbose,
            emissions_csv: path_string(self.emissions.as_ref()),
            indicators_csv: path_string(self.indicators.as_ref()),
            map_geojson: path_string(self.map.as_ref()),
            reports_dir: path_string(self.out_dir.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("carbonatlas").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Warn), Level::Warn);
        assert_eq!(Level::from(LogLevelArg::Info), Level::Info);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let overrides = parse(&["config"]).to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.emissions_csv.is_none());
        assert!(overrides.map_geojson.is_none());
        assert!(overrides.reports_dir.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let cli = parse(&[
            "--config-level",
            "debug",
            "--config-log-file",
            "/tmp/test.log",
            "--config-verbose",
            "yes",
            "--emissions",
            "co2.csv",
            "--map",
            "world.geojson",
            "--out-dir",
            "/output",
            "config",
        ]);

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.file, Some("/tmp/test.log".to_string()));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.emissions_csv, Some("co2.csv".to_string()));
        assert_eq!(overrides.indicators_csv, None);
        assert_eq!(overrides.map_geojson, Some("world.geojson".to_string()));
        assert_eq!(overrides.reports_dir, Some("/output".to_string()));
    }

    #[test]
    fn test_selection_args() {
        let cli = parse(&[
            "dashboard", "-c", "DEU,FRA", "--country", "Chile", "-m", "co2_per_capita", "--from",
            "1990", "--indexed", "-f", "svg",
        ]);
        let Command::Dashboard {
            selection, format, ..
        } = cli.command
        else {
            panic!("expected dashboard command");
        };
        assert_eq!(selection.countries, ["DEU", "FRA", "Chile"]);
        assert_eq!(selection.metric.as_deref(), Some("co2_per_capita"));
        assert_eq!(selection.from, Some(1990));
        assert!(selection.indexed);
        assert_eq!(format, "svg");
    }
}
