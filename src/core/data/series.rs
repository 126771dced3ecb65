//! Year-indexed series and the grouping / share helpers built on them

use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// A single observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Calendar year
    pub year: i32,
    /// Observed value
    pub value: f64,
}

impl Point {
    /// Create a point
    #[must_use]
    pub const fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

/// A labelled sequence of points sorted by year with at most one point per year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Stable identifier (ISO code for countries), used for selection
    pub key: String,
    /// Human readable label
    pub label: String,
    /// Points in ascending year order
    pub points: Vec<Point>,
}

impl Series {
    /// Build a series from unordered points.
    ///
    /// Non-finite values are dropped. When a year appears more than once the
    /// last occurrence wins.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>, points: Vec<Point>) -> Self {
        let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
        for point in points.into_iter().filter(|p| p.value.is_finite()) {
            by_year.insert(point.year, point.value);
        }
        Self {
            key: key.into(),
            label: label.into(),
            points: by_year
                .into_iter()
                .map(|(year, value)| Point { year, value })
                .collect(),
        }
    }

    /// Whether the series holds no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Minimum and maximum value, `None` when empty
    #[must_use]
    pub fn extent(&self) -> Option<(f64, f64)> {
        extent(self.points.iter().map(|p| p.value))
    }

    /// First and last year, `None` when empty
    #[must_use]
    pub fn year_extent(&self) -> Option<(i32, i32)> {
        Some((self.points.first()?.year, self.points.last()?.year))
    }

    /// Value observed in `year`
    #[must_use]
    pub fn value_at(&self, year: i32) -> Option<f64> {
        self.points
            .binary_search_by_key(&year, |p| p.year)
            .ok()
            .map(|idx| self.points[idx].value)
    }

    /// Copy of this series restricted to `years`
    #[must_use]
    pub fn within(&self, years: &RangeInclusive<i32>) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            points: self
                .points
                .iter()
                .filter(|p| years.contains(&p.year))
                .copied()
                .collect(),
        }
    }

    /// Most recent point
    #[must_use]
    pub fn latest(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Point with the highest value (earliest year on ties)
    #[must_use]
    pub fn peak(&self) -> Option<Point> {
        self.points.iter().copied().fold(None, |best, p| match best {
            Some(b) if b.value >= p.value => Some(b),
            _ => Some(p),
        })
    }

    /// Percent change between the first and last point inside `years`.
    ///
    /// `None` when fewer than two points fall in the range or the start value is zero.
    #[must_use]
    pub fn change_between(&self, years: &RangeInclusive<i32>) -> Option<f64> {
        let mut inside = self.points.iter().filter(|p| years.contains(&p.year));
        let first = inside.next()?;
        let last = inside.last()?;
        if first.value == 0.0 {
            return None;
        }
        Some((last.value - first.value) / first.value.abs() * 100.0)
    }

    /// Normalize to an index where the value in `base_year` equals 100.
    ///
    /// When the base year is missing the first point is used; a zero base
    /// yields `None`.
    #[must_use]
    pub fn indexed(&self, base_year: i32) -> Option<Self> {
        let base = self
            .value_at(base_year)
            .or_else(|| self.points.first().map(|p| p.value))?;
        if base == 0.0 {
            return None;
        }
        Some(Self {
            key: self.key.clone(),
            label: self.label.clone(),
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.year, p.value / base * 100.0))
                .collect(),
        })
    }
}

/// Minimum and maximum of finite values
#[must_use]
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Group items by a key, preserving input order inside each group
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, mut key_fn: F) -> BTreeMap<K, Vec<T>>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for item in items {
        groups.entry(key_fn(&item)).or_default().push(item);
    }
    groups
}

/// One labelled part of a total and its percentage share
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    /// Part label (e.g. "Coal")
    pub label: String,
    /// Raw value of the part
    pub value: f64,
    /// Share of the total in percent (0..=100)
    pub percent: f64,
}

/// Compute percentage shares of labelled parts.
///
/// Negative and non-finite parts contribute zero. A zero total yields zero
/// shares for every part.
#[must_use]
pub fn shares<S: AsRef<str>>(parts: &[(S, f64)]) -> Vec<Share> {
    let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
    let total: f64 = parts.iter().map(|(_, v)| clean(*v)).sum();
    parts
        .iter()
        .map(|(label, value)| {
            let part = clean(*value);
            Share {
                label: label.as_ref().to_string(),
                value: part,
                percent: if total > 0.0 { part / total * 100.0 } else { 0.0 },
            }
        })
        .collect()
}

/// Shares for one bar of a stacked bar chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackedYear {
    /// Year of the bar
    pub year: i32,
    /// Stack segments, bottom first
    pub segments: Vec<Share>,
}

impl StackedYear {
    /// Sum of segment values
    #[must_use]
    pub fn total(&self) -> f64 {
        self.segments.iter().map(|s| s.value).sum()
    }
}
