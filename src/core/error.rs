//! Error types for the data layer

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or querying datasets
#[derive(Debug, Error)]
pub enum DataError {
    /// The input file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed to open
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The CSV reader failed on a record it could not recover from
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No header row with the required leading columns was found
    #[error("no header row containing '{0}' found")]
    MissingHeader(String),

    /// A required column is absent from the header row
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// Map geometry could not be parsed
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] serde_json::Error),

    /// Country name or ISO code did not match any row
    #[error("unknown country: '{0}'")]
    UnknownCountry(String),

    /// Metric name did not match any known emissions column
    #[error("unknown metric: '{0}'")]
    UnknownMetric(String),

    /// Indicator code or name did not match any row
    #[error("unknown indicator: '{0}'")]
    UnknownIndicator(String),
}

impl DataError {
    /// Wrap an I/O error with the path that produced it
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for the data layer
pub type DataResult<T> = Result<T, DataError>;
