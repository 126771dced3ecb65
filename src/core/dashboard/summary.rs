//! Per-country summary rows

use crate::core::chart::axis::{format_change, format_value};
use crate::core::data::{Point, Series};
use std::ops::RangeInclusive;

/// Key figures of one series over the selected range
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    /// Country key
    pub key: String,
    /// Country name
    pub name: String,
    /// Most recent observation in the range
    pub latest: Option<Point>,
    /// Percent change between the first and last observation in the range
    pub change: Option<f64>,
    /// Highest observation in the range
    pub peak: Option<Point>,
}

impl SummaryRow {
    /// Summarise `series` restricted to `years`
    #[must_use]
    pub fn from_series(series: &Series, years: &RangeInclusive<i32>) -> Self {
        let inside = series.within(years);
        Self {
            key: series.key.clone(),
            name: series.label.clone(),
            latest: inside.latest(),
            change: inside.change_between(years),
            peak: inside.peak(),
        }
    }

    /// `"12,345 (2020)"` or `"n/a"`
    #[must_use]
    pub fn latest_text(&self) -> String {
        point_text(self.latest)
    }

    /// `"+12.3%"` or `"n/a"`
    #[must_use]
    pub fn change_text(&self) -> String {
        self.change.map_or_else(|| "n/a".to_string(), format_change)
    }

    /// `"12,345 (2005)"` or `"n/a"`
    #[must_use]
    pub fn peak_text(&self) -> String {
        point_text(self.peak)
    }
}

fn point_text(point: Option<Point>) -> String {
    point.map_or_else(
        || "n/a".to_string(),
        |p| format!("{} ({})", format_value(p.value), p.year),
    )
}

/// One row per series, in input order
#[must_use]
pub fn summarize(series: &[Series], years: &RangeInclusive<i32>) -> Vec<SummaryRow> {
    series
        .iter()
        .map(|s| SummaryRow::from_series(s, years))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_row() {
        let series = Series::new(
            "DEU",
            "Germany",
            vec![
                Point::new(1990, 1000.0),
                Point::new(2000, 1200.0),
                Point::new(2010, 800.0),
                Point::new(2020, 600.0),
            ],
        );
        let row = SummaryRow::from_series(&series, &(1990..=2010));
        assert_eq!(row.latest, Some(Point::new(2010, 800.0)));
        assert_eq!(row.peak, Some(Point::new(2000, 1200.0)));
        assert_eq!(row.change_text(), "-20.0%");
        assert_eq!(row.latest_text(), "800 (2010)");
        assert_eq!(row.peak_text(), "1,200 (2000)");
    }

    #[test]
    fn test_empty_series_is_not_available() {
        let rows = summarize(&[Series::new("XXX", "Nowhere", vec![])], &(1990..=2020));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].latest_text(), "n/a");
        assert_eq!(rows[0].change_text(), "n/a");
    }
}
