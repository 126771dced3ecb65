//! Dataset loading and typed series extraction
//!
//! Both datasets are plain CSV files. Rows that cannot be coerced into typed
//! records are dropped during parsing; lookups that find nothing return empty
//! series so callers can render a "no data" state.

pub mod emissions;
pub mod indicators;
pub mod series;

pub use emissions::{load_emissions, parse_emissions, EmissionMetric, EmissionRecord, EmissionsTable};
pub use indicators::{
    load_indicators, parse_indicators, IndicatorRecord, IndicatorRef, IndicatorTable,
};
pub use series::{extent, group_by, shares, Point, Series, Share, StackedYear};

use crate::core::error::DataResult;
use std::ops::RangeInclusive;
use std::path::Path;

/// A selectable country or region
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CountryRef {
    /// Selection key (ISO code, or the name for aggregates without one)
    pub key: String,
    /// Display name
    pub name: String,
    /// ISO 3166-1 alpha-3 code
    pub iso_code: Option<String>,
}

/// Whether an ISO-like code denotes an aggregate (Our World in Data uses `OWID_` prefixes)
#[must_use]
pub fn is_aggregate_code(code: &str) -> bool {
    code.is_empty() || code.starts_with("OWID_")
}

/// Both datasets loaded together
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    /// CO₂ emissions by country and year
    pub emissions: EmissionsTable,
    /// Development indicators; empty when no indicator file was supplied
    pub indicators: IndicatorTable,
}

impl Datasets {
    /// Load the emissions CSV and, when given, the indicators CSV
    ///
    /// # Errors
    /// Returns the first loading error encountered.
    pub fn load(emissions: &Path, indicators: Option<&Path>) -> DataResult<Self> {
        let emissions = load_emissions(emissions)?;
        let indicators = match indicators {
            Some(path) => load_indicators(path)?,
            None => IndicatorTable::default(),
        };
        Ok(Self {
            emissions,
            indicators,
        })
    }

    /// Union of the year ranges of both tables
    #[must_use]
    pub fn year_range(&self) -> Option<RangeInclusive<i32>> {
        match (self.emissions.year_range(), self.indicators.year_range()) {
            (Some(a), Some(b)) => Some(*a.start().min(b.start())..=*a.end().max(b.end())),
            (a, b) => a.or(b),
        }
    }
}
