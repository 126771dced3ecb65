//! World Bank development indicators (WDI wide export)
//!
//! Layout: `Country Name, Country Code, Indicator Name, Indicator Code`
//! followed by one column per year. Download files carry a few preamble
//! lines ahead of the header; DataBank exports label the years
//! `1990 [YR1990]` and use `Series Name` / `Series Code`. Both are accepted.

use super::series::{Point, Series};
use super::CountryRef;
use crate::core::error::{DataError, DataResult};
use crate::{debug, info};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::ops::RangeInclusive;
use std::path::Path;

const COUNTRY_NAME: &str = "Country Name";

/// One observation of an indicator for a country-year
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRecord {
    /// Country name
    pub country: String,
    /// Three-letter country code
    pub country_code: String,
    /// Indicator display name
    pub indicator_name: String,
    /// Indicator code (e.g. `NY.GDP.PCAP.CD`)
    pub indicator_code: String,
    /// Calendar year
    pub year: i32,
    /// Observed value
    pub value: f64,
}

/// Indicator identity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct IndicatorRef {
    /// Indicator code
    pub code: String,
    /// Indicator display name
    pub name: String,
}

#[derive(Debug)]
struct Columns {
    country: usize,
    country_code: usize,
    indicator_name: usize,
    indicator_code: usize,
    years: Vec<(usize, i32)>,
}

impl Columns {
    fn from_header(header: &csv::StringRecord) -> DataResult<Self> {
        let find = |names: &[&str]| {
            header
                .iter()
                .position(|h| names.iter().any(|n| clean_cell(h).eq_ignore_ascii_case(n)))
        };
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| DataError::MissingColumn(names[0].to_string()))
        };

        let years = header
            .iter()
            .enumerate()
            .filter_map(|(idx, h)| parse_year_header(h).map(|year| (idx, year)))
            .collect();

        Ok(Self {
            country: require(&[COUNTRY_NAME])?,
            country_code: require(&["Country Code"])?,
            indicator_name: require(&["Indicator Name", "Series Name"])?,
            indicator_code: require(&["Indicator Code", "Series Code"])?,
            years,
        })
    }
}

/// Strip whitespace and a leading byte-order mark
fn clean_cell(cell: &str) -> &str {
    cell.trim().trim_start_matches('\u{feff}').trim()
}

/// Year from a header such as `1990` or `1990 [YR1990]`
fn parse_year_header(header: &str) -> Option<i32> {
    let header = clean_cell(header);
    let digits = header.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let rest = &header[4..];
    if rest.is_empty() || rest.starts_with(' ') {
        digits.parse().ok()
    } else {
        None
    }
}

/// Numeric cell; blank, `..` and non-finite cells are missing
fn parse_value(cell: &str) -> Option<f64> {
    let cell = clean_cell(cell);
    if cell.is_empty() || cell == ".." {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Load the indicators CSV at `path`
///
/// # Errors
/// Returns an error if the file cannot be opened, has no `Country Name`
/// header row, or lacks one of the identity columns.
pub fn load_indicators<P: AsRef<Path>>(path: P) -> DataResult<IndicatorTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    let table = parse_indicators(file)?;
    info!(
        "Loaded {} indicator observations ({} indicators) from {}",
        table.len(),
        table.indicators().len(),
        path.display()
    );
    Ok(table)
}

/// Parse indicator CSV content from any reader
///
/// # Errors
/// Returns an error when no header row is found, a required column is
/// missing, or on a CSV framing error.
pub fn parse_indicators<R: Read>(reader: R) -> DataResult<IndicatorTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = csv_reader.records();
    let mut columns = None;
    for row in rows.by_ref() {
        let row = row?;
        if row
            .get(0)
            .is_some_and(|first| clean_cell(first).eq_ignore_ascii_case(COUNTRY_NAME))
        {
            columns = Some(Columns::from_header(&row)?);
            break;
        }
    }
    let columns = columns.ok_or_else(|| DataError::MissingHeader(COUNTRY_NAME.to_string()))?;

    let mut records = Vec::new();
    let mut skipped = 0;
    for row in rows {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                skipped += 1;
                debug!("Skipping malformed indicator row: {e}");
                continue;
            }
        };
        let cell = |idx: usize| row.get(idx).map(clean_cell).unwrap_or_default();
        let (country, code) = (cell(columns.country), cell(columns.country_code));
        let (name, indicator) = (cell(columns.indicator_name), cell(columns.indicator_code));
        if country.is_empty() || code.is_empty() || indicator.is_empty() {
            skipped += 1;
            continue;
        }

        for &(idx, year) in &columns.years {
            if let Some(value) = row.get(idx).and_then(parse_value) {
                records.push(IndicatorRecord {
                    country: country.to_string(),
                    country_code: code.to_ascii_uppercase(),
                    indicator_name: name.to_string(),
                    indicator_code: indicator.to_string(),
                    year,
                    value,
                });
            }
        }
    }
    if skipped > 0 {
        debug!("Skipped {skipped} indicator rows without identity columns");
    }

    Ok(IndicatorTable::from_records(records))
}

/// All indicator observations, sorted by indicator, country and year
#[derive(Debug, Clone, Default)]
pub struct IndicatorTable {
    records: Vec<IndicatorRecord>,
}

impl IndicatorTable {
    /// Build a table from records in any order
    #[must_use]
    pub fn from_records(mut records: Vec<IndicatorRecord>) -> Self {
        records.sort_by(|a, b| {
            a.indicator_code
                .cmp(&b.indicator_code)
                .then_with(|| a.country_code.cmp(&b.country_code))
                .then(a.year.cmp(&b.year))
        });
        Self { records }
    }

    /// All observations
    #[must_use]
    pub fn records(&self) -> &[IndicatorRecord] {
        &self.records
    }

    /// Number of observations
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct indicators sorted by name
    #[must_use]
    pub fn indicators(&self) -> Vec<IndicatorRef> {
        let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
        for r in &self.records {
            seen.entry(r.indicator_code.as_str())
                .or_insert(r.indicator_name.as_str());
        }
        let mut out: Vec<IndicatorRef> = seen
            .into_iter()
            .map(|(code, name)| IndicatorRef {
                code: code.to_string(),
                name: name.to_string(),
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Distinct countries sorted by name
    #[must_use]
    pub fn countries(&self) -> Vec<CountryRef> {
        let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
        for r in &self.records {
            seen.entry(r.country_code.as_str())
                .or_insert(r.country.as_str());
        }
        let mut out: Vec<CountryRef> = seen
            .into_iter()
            .map(|(code, name)| CountryRef {
                key: code.to_string(),
                name: name.to_string(),
                iso_code: Some(code.to_string()),
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Find an indicator by exact code or name, then by name substring
    #[must_use]
    pub fn resolve_indicator(&self, query: &str) -> Option<IndicatorRef> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let indicators = self.indicators();
        let needle = query.to_lowercase();
        indicators
            .iter()
            .find(|i| i.code.eq_ignore_ascii_case(query) || i.name.eq_ignore_ascii_case(query))
            .or_else(|| {
                indicators
                    .iter()
                    .find(|i| i.name.to_lowercase().contains(&needle))
            })
            .cloned()
    }

    /// [`resolve_indicator`](Self::resolve_indicator), failing when nothing
    /// matches
    pub fn require_indicator(&self, query: &str) -> DataResult<IndicatorRef> {
        self.resolve_indicator(query)
            .ok_or_else(|| DataError::UnknownIndicator(query.trim().to_string()))
    }

    /// First and last year with an observation
    #[must_use]
    pub fn year_range(&self) -> Option<RangeInclusive<i32>> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some(min..=max)
    }

    fn rows_for<'a>(&'a self, indicator_code: &'a str) -> &'a [IndicatorRecord] {
        let start = self
            .records
            .partition_point(|r| r.indicator_code.as_str() < indicator_code);
        let len = self.records[start..]
            .iter()
            .take_while(|r| r.indicator_code == indicator_code)
            .count();
        &self.records[start..start + len]
    }

    /// Year series of an indicator for one country; empty when unknown
    #[must_use]
    pub fn series(&self, country_code: &str, indicator_code: &str) -> Series {
        let rows: Vec<&IndicatorRecord> = self
            .rows_for(indicator_code)
            .iter()
            .filter(|r| r.country_code.eq_ignore_ascii_case(country_code))
            .collect();
        let label = rows
            .first()
            .map_or_else(|| country_code.to_string(), |r| r.country.clone());
        let points = rows.iter().map(|r| Point::new(r.year, r.value)).collect();
        Series::new(country_code.to_ascii_uppercase(), label, points)
    }

    /// Values of an indicator in `year` keyed by country code
    #[must_use]
    pub fn values_for_year(&self, year: i32, indicator_code: &str) -> HashMap<String, f64> {
        self.rows_for(indicator_code)
            .iter()
            .filter(|r| r.year == year)
            .map(|r| (r.country_code.clone(), r.value))
            .collect()
    }
}
