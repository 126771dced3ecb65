//! CO₂ emissions dataset (one row per country and year)
//!
//! The loader reads the Our World in Data column layout: `country`, `year`,
//! `iso_code` followed by numeric columns. Only the columns named by
//! [`EmissionMetric`] are kept; anything else in the file is ignored.

use super::series::{group_by, shares, Point, Series, StackedYear};
use super::{is_aggregate_code, CountryRef};
use crate::core::error::{DataError, DataResult};
use crate::{debug, info};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::ops::RangeInclusive;
use std::path::Path;
use std::str::FromStr;

/// Numeric columns of the emissions dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EmissionMetric {
    /// Annual territorial CO₂ emissions
    Co2,
    /// CO₂ emissions per person
    Co2PerCapita,
    /// CO₂ from coal
    CoalCo2,
    /// CO₂ from oil
    OilCo2,
    /// CO₂ from gas
    GasCo2,
    /// CO₂ from cement production
    CementCo2,
    /// CO₂ from gas flaring
    FlaringCo2,
    /// CO₂ from other industry
    OtherIndustryCo2,
    /// Share of global CO₂ emissions
    ShareGlobalCo2,
    /// Population
    Population,
    /// Gross domestic product
    Gdp,
}

impl EmissionMetric {
    /// Every metric in column order
    pub const ALL: [Self; 11] = [
        Self::Co2,
        Self::Co2PerCapita,
        Self::CoalCo2,
        Self::OilCo2,
        Self::GasCo2,
        Self::CementCo2,
        Self::FlaringCo2,
        Self::OtherIndustryCo2,
        Self::ShareGlobalCo2,
        Self::Population,
        Self::Gdp,
    ];

    /// Emission sources that add up to total CO₂, bottom of the stack first
    pub const SOURCES: [Self; 6] = [
        Self::CoalCo2,
        Self::OilCo2,
        Self::GasCo2,
        Self::CementCo2,
        Self::FlaringCo2,
        Self::OtherIndustryCo2,
    ];

    /// CSV column name
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Co2 => "co2",
            Self::Co2PerCapita => "co2_per_capita",
            Self::CoalCo2 => "coal_co2",
            Self::OilCo2 => "oil_co2",
            Self::GasCo2 => "gas_co2",
            Self::CementCo2 => "cement_co2",
            Self::FlaringCo2 => "flaring_co2",
            Self::OtherIndustryCo2 => "other_industry_co2",
            Self::ShareGlobalCo2 => "share_global_co2",
            Self::Population => "population",
            Self::Gdp => "gdp",
        }
    }

    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Co2 => "CO₂ emissions",
            Self::Co2PerCapita => "CO₂ per capita",
            Self::CoalCo2 => "Coal",
            Self::OilCo2 => "Oil",
            Self::GasCo2 => "Gas",
            Self::CementCo2 => "Cement",
            Self::FlaringCo2 => "Flaring",
            Self::OtherIndustryCo2 => "Other industry",
            Self::ShareGlobalCo2 => "Share of global CO₂",
            Self::Population => "Population",
            Self::Gdp => "GDP",
        }
    }

    /// Unit of measure
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Co2PerCapita => "t",
            Self::ShareGlobalCo2 => "%",
            Self::Population => "people",
            Self::Gdp => "int-$",
            _ => "Mt",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EmissionMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for EmissionMetric {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|m| m.column() == wanted)
            .ok_or_else(|| DataError::UnknownMetric(s.to_string()))
    }
}

/// One country-year row
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionRecord {
    /// Country or region name
    pub country: String,
    /// ISO 3166-1 alpha-3 code, absent for most aggregates
    pub iso_code: Option<String>,
    /// Calendar year
    pub year: i32,
    values: [Option<f64>; EmissionMetric::ALL.len()],
}

impl EmissionRecord {
    /// Create a record with no metric values
    #[must_use]
    pub fn new(country: impl Into<String>, iso_code: Option<String>, year: i32) -> Self {
        Self {
            country: country.into(),
            iso_code,
            year,
            values: [None; EmissionMetric::ALL.len()],
        }
    }

    /// Builder-style setter; non-finite values are stored as missing
    #[must_use]
    pub fn with(mut self, metric: EmissionMetric, value: f64) -> Self {
        self.set(metric, Some(value));
        self
    }

    /// Set or clear a metric value
    pub fn set(&mut self, metric: EmissionMetric, value: Option<f64>) {
        self.values[metric.index()] = value.filter(|v| v.is_finite());
    }

    /// Value of `metric`, `None` when missing
    #[must_use]
    pub const fn value(&self, metric: EmissionMetric) -> Option<f64> {
        self.values[metric.index()]
    }

    /// Selection key: ISO code when present, otherwise the name
    #[must_use]
    pub fn key(&self) -> &str {
        self.iso_code.as_deref().unwrap_or(&self.country)
    }

    /// Whether this row describes a region or income group rather than a country
    #[must_use]
    pub fn is_aggregate(&self) -> bool {
        self.iso_code.as_deref().map_or(true, is_aggregate_code)
    }
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    country: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    year: Option<i32>,
    #[serde(default)]
    iso_code: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    co2: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    co2_per_capita: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    coal_co2: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    oil_co2: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    gas_co2: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    cement_co2: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    flaring_co2: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    other_industry_co2: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    share_global_co2: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    population: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    gdp: Option<f64>,
}

impl RawRow {
    fn into_record(self) -> Option<EmissionRecord> {
        let country = self.country.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())?;
        let year = self.year?;
        let iso_code = self
            .iso_code
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty());

        let mut record = EmissionRecord::new(country, iso_code, year);
        record.set(EmissionMetric::Co2, self.co2);
        record.set(EmissionMetric::Co2PerCapita, self.co2_per_capita);
        record.set(EmissionMetric::CoalCo2, self.coal_co2);
        record.set(EmissionMetric::OilCo2, self.oil_co2);
        record.set(EmissionMetric::GasCo2, self.gas_co2);
        record.set(EmissionMetric::CementCo2, self.cement_co2);
        record.set(EmissionMetric::FlaringCo2, self.flaring_co2);
        record.set(EmissionMetric::OtherIndustryCo2, self.other_industry_co2);
        record.set(EmissionMetric::ShareGlobalCo2, self.share_global_co2);
        record.set(EmissionMetric::Population, self.population);
        record.set(EmissionMetric::Gdp, self.gdp);
        Some(record)
    }
}

/// Load the emissions CSV at `path`
///
/// # Errors
/// Returns an error if the file cannot be opened, lacks the `country` or
/// `year` column, or is not valid CSV.
pub fn load_emissions<P: AsRef<Path>>(path: P) -> DataResult<EmissionsTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    let table = parse_emissions(file)?;
    info!(
        "Loaded {} emission rows from {} ({} skipped)",
        table.len(),
        path.display(),
        table.skipped()
    );
    Ok(table)
}

/// Parse emissions CSV content from any reader
///
/// # Errors
/// Returns an error if the header lacks `country` or `year`, or on a CSV
/// framing error. Rows with a missing country or year are skipped.
pub fn parse_emissions<R: Read>(reader: R) -> DataResult<EmissionsTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for required in ["country", "year"] {
        if !headers.iter().any(|h| h == required) {
            return Err(DataError::MissingColumn(required.to_string()));
        }
    }

    let mut records = Vec::new();
    let mut skipped = 0;
    for (line, row) in csv_reader.deserialize::<RawRow>().enumerate() {
        match row.map(RawRow::into_record) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {
                skipped += 1;
                debug!("Skipping emissions row {}: missing country or year", line + 2);
            }
            Err(e) => {
                skipped += 1;
                debug!("Skipping malformed emissions row {}: {e}", line + 2);
            }
        }
    }

    Ok(EmissionsTable::from_records(records).with_skipped(skipped))
}

/// All emissions rows, sorted by country key then year
#[derive(Debug, Clone, Default)]
pub struct EmissionsTable {
    records: Vec<EmissionRecord>,
    skipped: usize,
}

impl EmissionsTable {
    /// Build a table from records in any order
    #[must_use]
    pub fn from_records(mut records: Vec<EmissionRecord>) -> Self {
        records.sort_by(|a, b| a.key().cmp(b.key()).then(a.year.cmp(&b.year)));
        Self {
            records,
            skipped: 0,
        }
    }

    #[must_use]
    const fn with_skipped(mut self, skipped: usize) -> Self {
        self.skipped = skipped;
        self
    }

    /// All rows
    #[must_use]
    pub fn records(&self) -> &[EmissionRecord] {
        &self.records
    }

    /// Number of rows kept
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no rows were kept
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows dropped while parsing
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Countries (aggregates excluded), sorted by name
    #[must_use]
    pub fn countries(&self) -> Vec<CountryRef> {
        self.distinct(|r| !r.is_aggregate())
    }

    /// Regions and income groups, sorted by name
    #[must_use]
    pub fn aggregates(&self) -> Vec<CountryRef> {
        self.distinct(EmissionRecord::is_aggregate)
    }

    fn distinct(&self, keep: impl Fn(&EmissionRecord) -> bool) -> Vec<CountryRef> {
        let groups = group_by(self.records.iter().filter(|r| keep(r)), |r| {
            r.key().to_string()
        });
        let mut out: Vec<CountryRef> = groups
            .into_iter()
            .filter_map(|(key, rows)| {
                let first = rows.first()?;
                Some(CountryRef {
                    key,
                    name: first.country.clone(),
                    iso_code: first.iso_code.clone(),
                })
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// First and last year present
    #[must_use]
    pub fn year_range(&self) -> Option<RangeInclusive<i32>> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some(min..=max)
    }

    /// Look up a country or aggregate by ISO code or name (case-insensitive)
    #[must_use]
    pub fn resolve_country(&self, query: &str) -> Option<CountryRef> {
        let query = query.trim();
        self.records
            .iter()
            .find(|r| {
                r.iso_code
                    .as_deref()
                    .is_some_and(|code| code.eq_ignore_ascii_case(query))
            })
            .or_else(|| {
                self.records
                    .iter()
                    .find(|r| r.country.eq_ignore_ascii_case(query))
            })
            .map(|r| CountryRef {
                key: r.key().to_string(),
                name: r.country.clone(),
                iso_code: r.iso_code.clone(),
            })
    }

    /// Stored spelling of a selection key, matched case-insensitively
    #[must_use]
    pub fn canonical_key(&self, key: &str) -> Option<&str> {
        let key = key.trim();
        self.records
            .iter()
            .map(EmissionRecord::key)
            .find(|k| k.eq_ignore_ascii_case(key))
    }

    /// [`resolve_country`](Self::resolve_country), failing when nothing
    /// matches
    pub fn require_country(&self, query: &str) -> DataResult<CountryRef> {
        self.resolve_country(query)
            .ok_or_else(|| DataError::UnknownCountry(query.trim().to_string()))
    }

    fn rows_for<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a EmissionRecord> + 'a {
        let key = self.canonical_key(key).unwrap_or_default();
        let start = self.records.partition_point(|r| r.key() < key);
        self.records[start..].iter().take_while(move |r| r.key() == key)
    }

    /// Year series of `metric` for the country with selection key `key`.
    ///
    /// Unknown keys produce an empty series labelled with the key.
    #[must_use]
    pub fn series(&self, key: &str, metric: EmissionMetric) -> Series {
        let key = self.canonical_key(key).unwrap_or(key);
        let label = self
            .rows_for(key)
            .next()
            .map_or_else(|| key.to_string(), |r| r.country.clone());
        let points = self
            .rows_for(key)
            .filter_map(|r| r.value(metric).map(|v| Point::new(r.year, v)))
            .collect();
        Series::new(key, label, points)
    }

    /// Values of `metric` in `year` for every country with an ISO code
    #[must_use]
    pub fn values_for_year(&self, year: i32, metric: EmissionMetric) -> HashMap<String, f64> {
        self.records
            .iter()
            .filter(|r| r.year == year && !r.is_aggregate())
            .filter_map(|r| Some((r.iso_code.clone()?, r.value(metric)?)))
            .collect()
    }

    /// Emission source breakdown of one country-year.
    ///
    /// `None` when the row is missing or has no source values at all.
    #[must_use]
    pub fn source_mix(&self, key: &str, year: i32) -> Option<StackedYear> {
        let record = self.rows_for(key).find(|r| r.year == year)?;
        source_mix_of(record)
    }

    /// Source breakdowns for every year of `years` that has source data
    #[must_use]
    pub fn source_mix_series(&self, key: &str, years: &RangeInclusive<i32>) -> Vec<StackedYear> {
        self.rows_for(key)
            .filter(|r| years.contains(&r.year))
            .filter_map(source_mix_of)
            .collect()
    }
}

fn source_mix_of(record: &EmissionRecord) -> Option<StackedYear> {
    let values: Vec<Option<f64>> = EmissionMetric::SOURCES
        .iter()
        .map(|m| record.value(*m))
        .collect();
    if values.iter().all(Option::is_none) {
        return None;
    }
    let parts: Vec<(&str, f64)> = EmissionMetric::SOURCES
        .iter()
        .zip(values)
        .map(|(m, v)| (m.label(), v.unwrap_or(0.0)))
        .collect();
    Some(StackedYear {
        year: record.year,
        segments: shares(&parts),
    })
}
