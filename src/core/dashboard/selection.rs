//! User selection state and the events that change it

use crate::core::data::EmissionMetric;
use std::ops::RangeInclusive;

/// Default cap on simultaneously selected countries (one per palette colour)
pub const DEFAULT_MAX_SELECTED: usize = 10;

/// A user interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Add a country to the selection, or remove it if already selected
    ToggleCountry(String),
    /// Year shown on the map and in the source mix
    SetYear(i32),
    /// Year range of the line charts
    SetRange(i32, i32),
    /// Emissions metric for the line chart and map
    SetMetric(EmissionMetric),
    /// Indicator code for the second line chart, `None` to hide it
    SetIndicator(Option<String>),
    /// Country whose source mix is shown; selects it when needed
    Focus(String),
    /// Show line charts as an index (first year of the range = 100)
    SetIndexed(bool),
}

/// Current selection of countries, years and measures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    countries: Vec<String>,
    year: i32,
    range: RangeInclusive<i32>,
    bounds: RangeInclusive<i32>,
    metric: EmissionMetric,
    indicator: Option<String>,
    focus: Option<String>,
    indexed: bool,
    max_selected: usize,
}

impl Selection {
    /// Empty selection over the data years `bounds`; the year starts at the
    /// latest data year and the range covers all of `bounds`.
    #[must_use]
    pub fn new(bounds: RangeInclusive<i32>, max_selected: usize) -> Self {
        let bounds = ordered(*bounds.start(), *bounds.end());
        Self {
            countries: Vec::new(),
            year: *bounds.end(),
            range: bounds.clone(),
            bounds,
            metric: EmissionMetric::Co2,
            indicator: None,
            focus: None,
            indexed: false,
            max_selected: max_selected.max(1),
        }
    }

    /// Apply an event; returns whether anything changed
    pub fn apply(&mut self, event: Event) -> bool {
        let before = self.clone();
        match event {
            Event::ToggleCountry(key) => self.toggle(&key),
            Event::SetYear(year) => self.year = self.clamp(year),
            Event::SetRange(from, to) => {
                let (from, to) = (self.clamp(from), self.clamp(to));
                self.range = ordered(from, to);
            }
            Event::SetMetric(metric) => self.metric = metric,
            Event::SetIndicator(code) => {
                self.indicator = code.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
            }
            Event::Focus(key) => {
                if self.position(&key).is_none() {
                    self.toggle(&key);
                }
                self.focus = self.position(&key).map(|idx| self.countries[idx].clone());
            }
            Event::SetIndexed(indexed) => self.indexed = indexed,
        }
        *self != before
    }

    fn clamp(&self, year: i32) -> i32 {
        year.clamp(*self.bounds.start(), *self.bounds.end())
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.countries
            .iter()
            .position(|k| k.eq_ignore_ascii_case(key.trim()))
    }

    fn toggle(&mut self, key: &str) {
        let key = key.trim();
        if key.is_empty() {
            return;
        }
        if let Some(idx) = self.position(key) {
            let removed = self.countries.remove(idx);
            if self.focus.as_deref() == Some(removed.as_str()) {
                self.focus = None;
            }
            return;
        }
        self.countries.push(key.to_string());
        if self.countries.len() > self.max_selected {
            let evicted = self.countries.remove(0);
            if self.focus.as_deref() == Some(evicted.as_str()) {
                self.focus = None;
            }
        }
    }

    /// Selected country keys in selection order
    #[must_use]
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Whether `key` is selected (case-insensitive)
    #[must_use]
    pub fn is_selected(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Year shown on the map
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Year range of the line charts
    #[must_use]
    pub const fn range(&self) -> &RangeInclusive<i32> {
        &self.range
    }

    /// Data years the selection is clamped to
    #[must_use]
    pub const fn bounds(&self) -> &RangeInclusive<i32> {
        &self.bounds
    }

    /// Selected emissions metric
    #[must_use]
    pub const fn metric(&self) -> EmissionMetric {
        self.metric
    }

    /// Selected indicator code
    #[must_use]
    pub fn indicator(&self) -> Option<&str> {
        self.indicator.as_deref()
    }

    /// Country whose source mix is shown: the focused one, else the most
    /// recently selected
    #[must_use]
    pub fn focus(&self) -> Option<&str> {
        self.focus
            .as_deref()
            .or_else(|| self.countries.last().map(String::as_str))
    }

    /// Whether line charts are indexed
    #[must_use]
    pub const fn indexed(&self) -> bool {
        self.indexed
    }

    /// Maximum number of selected countries
    #[must_use]
    pub const fn max_selected(&self) -> usize {
        self.max_selected
    }
}

fn ordered(a: i32, b: i32) -> RangeInclusive<i32> {
    a.min(b)..=a.max(b)
}
