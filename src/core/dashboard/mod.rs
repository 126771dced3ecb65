//! Dashboard assembly and output formats
//!
//! A [`Dashboard`] combines the loaded datasets, optional map geometry and a
//! [`Selection`] into chart panels and summary rows. Output formats render a
//! dashboard through the [`ReportGenerator`] trait.

pub mod formats;
pub mod selection;
pub mod summary;

pub use formats::{HtmlReporter, MarkdownReporter, ReportFormat, SvgReporter};
pub use selection::{Event, Selection, DEFAULT_MAX_SELECTED};
pub use summary::{summarize, SummaryRow};

use crate::core::chart::{
    BarMode, ChoroplethMap, Frame, LineChart, Projection, StackedBarChart, WorldMap,
};
use crate::core::data::{Datasets, Series, StackedYear};
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

/// One rendered chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPanel {
    /// Stable identifier, also used as the SVG file stem
    pub id: &'static str,
    /// Heading shown above the chart
    pub title: String,
    /// Inline SVG markup
    pub svg: String,
}

/// Data context for dashboard rendering
#[derive(Debug, Clone)]
pub struct Dashboard<'a> {
    /// Loaded datasets
    pub data: &'a Datasets,
    /// Country outlines, when a GeoJSON file was given
    pub map: Option<&'a WorldMap>,
    /// Current selection
    pub selection: &'a Selection,
    /// Size of every chart
    pub frame: Frame,
    /// Map projection
    pub projection: Projection,
    /// Height encoding of the source mix chart
    pub bar_mode: BarMode,
}

impl<'a> Dashboard<'a> {
    /// Create a dashboard without map geometry
    #[must_use]
    pub fn new(data: &'a Datasets, selection: &'a Selection) -> Self {
        Self {
            data,
            map: None,
            selection,
            frame: Frame::default(),
            projection: Projection::default(),
            bar_mode: BarMode::default(),
        }
    }

    /// Attach map geometry
    #[must_use]
    pub const fn with_map(mut self, map: &'a WorldMap) -> Self {
        self.map = Some(map);
        self
    }

    /// Set the chart frame
    #[must_use]
    pub const fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    /// Set the map projection
    #[must_use]
    pub const fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Set the source mix height encoding
    #[must_use]
    pub const fn with_bar_mode(mut self, bar_mode: BarMode) -> Self {
        self.bar_mode = bar_mode;
        self
    }

    /// Page title
    #[must_use]
    pub fn title(&self) -> String {
        let range = self.selection.range();
        format!(
            "{} by country, {}–{}",
            self.selection.metric().label(),
            range.start(),
            range.end()
        )
    }

    /// Display name for a country key, falling back to the key
    #[must_use]
    pub fn country_name(&self, key: &str) -> String {
        self.data
            .emissions
            .resolve_country(key)
            .map(|c| c.name)
            .or_else(|| {
                self.data
                    .indicators
                    .countries()
                    .into_iter()
                    .find(|c| c.key.eq_ignore_ascii_case(key))
                    .map(|c| c.name)
            })
            .unwrap_or_else(|| key.to_string())
    }

    /// Selected country keys, spelled as in the data when a dataset knows them
    #[must_use]
    pub fn selected_keys(&self) -> Vec<String> {
        self.selection
            .countries()
            .iter()
            .map(|key| self.canonical_key(key))
            .collect()
    }

    fn canonical_key(&self, key: &str) -> String {
        self.data
            .emissions
            .canonical_key(key)
            .map(str::to_string)
            .or_else(|| {
                self.data
                    .indicators
                    .countries()
                    .into_iter()
                    .find(|c| c.key.eq_ignore_ascii_case(key.trim()))
                    .map(|c| c.key)
            })
            .unwrap_or_else(|| key.to_string())
    }

    /// Metric series of the selected countries over the selected range, raw
    #[must_use]
    pub fn raw_metric_series(&self) -> Vec<Series> {
        let range = self.selection.range();
        self.selected_keys()
            .iter()
            .map(|key| {
                self.data
                    .emissions
                    .series(key, self.selection.metric())
                    .within(range)
            })
            .collect()
    }

    /// Metric series as drawn: indexed when the selection asks for it
    #[must_use]
    pub fn metric_series(&self) -> Vec<Series> {
        self.maybe_indexed(self.raw_metric_series())
    }

    /// Indicator series of the selected countries, empty without an indicator
    #[must_use]
    pub fn indicator_series(&self) -> Vec<Series> {
        let Some(code) = self.selection.indicator() else {
            return Vec::new();
        };
        let range = self.selection.range();
        let series = self
            .selected_keys()
            .iter()
            .map(|key| self.data.indicators.series(key, code).within(range))
            .collect();
        self.maybe_indexed(series)
    }

    fn maybe_indexed(&self, series: Vec<Series>) -> Vec<Series> {
        if !self.selection.indexed() {
            return series;
        }
        let base = *self.selection.range().start();
        series
            .into_iter()
            .map(|s| {
                s.indexed(base)
                    .unwrap_or_else(|| Series::new(s.key.clone(), s.label.clone(), Vec::new()))
            })
            .collect()
    }

    /// Display name of the selected indicator
    #[must_use]
    pub fn indicator_name(&self) -> Option<String> {
        let code = self.selection.indicator()?;
        Some(
            self.data
                .indicators
                .resolve_indicator(code)
                .map_or_else(|| code.to_string(), |i| i.name),
        )
    }

    /// Source breakdown of the focused country over the selected range
    #[must_use]
    pub fn source_mix(&self) -> Vec<StackedYear> {
        self.selection.focus().map_or_else(Vec::new, |key| {
            self.data
                .emissions
                .source_mix_series(key, self.selection.range())
        })
    }

    /// Metric value per ISO code in the selected year
    #[must_use]
    pub fn map_values(&self) -> HashMap<String, f64> {
        self.data
            .emissions
            .values_for_year(self.selection.year(), self.selection.metric())
    }

    /// Summary rows for the selected countries (raw values)
    #[must_use]
    pub fn summary(&self) -> Vec<SummaryRow> {
        summarize(&self.raw_metric_series(), self.selection.range())
    }

    fn line_axis(&self, unit: &str) -> (String, String) {
        if self.selection.indexed() {
            (
                format!("Index ({} = 100)", self.selection.range().start()),
                String::new(),
            )
        } else {
            (unit.to_string(), unit.to_string())
        }
    }

    /// Line chart of the selected metric
    #[must_use]
    pub fn metric_panel(&self) -> ChartPanel {
        let metric = self.selection.metric();
        let title = metric.label().to_string();
        let (y_label, unit) = self.line_axis(metric.unit());
        let svg = LineChart::new(title.clone())
            .with_frame(self.frame)
            .with_axis(y_label, unit)
            .with_selected(&self.selected_keys())
            .render(&self.metric_series());
        ChartPanel {
            id: "emissions",
            title,
            svg,
        }
    }

    /// Line chart of the selected indicator, `None` without one
    #[must_use]
    pub fn indicator_panel(&self) -> Option<ChartPanel> {
        let title = self.indicator_name()?;
        let (y_label, unit) = self.line_axis("");
        let svg = LineChart::new(title.clone())
            .with_frame(self.frame)
            .with_axis(y_label, unit)
            .with_selected(&self.selected_keys())
            .render(&self.indicator_series());
        Some(ChartPanel {
            id: "indicator",
            title,
            svg,
        })
    }

    /// Stacked bars of the focused country's emission sources, `None`
    /// without a focused country
    #[must_use]
    pub fn sources_panel(&self) -> Option<ChartPanel> {
        let key = self.selection.focus()?;
        let title = format!("Emission sources: {}", self.country_name(key));
        let svg = StackedBarChart::new(title.clone())
            .with_frame(self.frame)
            .with_mode(self.bar_mode)
            .with_unit("Mt")
            .render(&self.source_mix());
        Some(ChartPanel {
            id: "sources",
            title,
            svg,
        })
    }

    /// Choropleth of the selected metric and year, `None` without geometry
    #[must_use]
    pub fn map_panel(&self) -> Option<ChartPanel> {
        let map = self.map?;
        let metric = self.selection.metric();
        let title = format!("{} in {}", metric.label(), self.selection.year());
        let svg = ChoroplethMap::new(title.clone())
            .with_frame(self.frame)
            .with_unit(metric.unit())
            .with_projection(self.projection)
            .with_selected(&self.selected_keys())
            .render(map, &self.map_values());
        Some(ChartPanel {
            id: "map",
            title,
            svg,
        })
    }

    /// Every panel that applies to the current selection, in page order
    #[must_use]
    pub fn panels(&self) -> Vec<ChartPanel> {
        let mut panels = vec![self.metric_panel()];
        panels.extend(self.indicator_panel());
        panels.extend(self.sources_panel());
        panels.extend(self.map_panel());
        panels
    }
}

/// Trait for dashboard output formats
pub trait ReportGenerator {
    /// Render the dashboard and write it to `output_path`
    ///
    /// # Errors
    /// Returns an error if rendering or file writing fails
    fn generate(&self, ctx: &Dashboard, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Render the dashboard as a string
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, ctx: &Dashboard) -> Result<String, Box<dyn Error>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::{EmissionMetric, EmissionRecord, EmissionsTable};

    fn datasets() -> Datasets {
        let mut records = Vec::new();
        for (year, co2, coal) in [(2000, 100.0, 60.0), (2010, 150.0, 90.0), (2020, 120.0, 50.0)] {
            records.push(
                EmissionRecord::new("Germany", Some("DEU".into()), year)
                    .with(EmissionMetric::Co2, co2)
                    .with(EmissionMetric::CoalCo2, coal)
                    .with(EmissionMetric::OilCo2, co2 - coal),
            );
            records.push(
                EmissionRecord::new("France", Some("FRA".into()), year)
                    .with(EmissionMetric::Co2, co2 / 2.0),
            );
        }
        Datasets {
            emissions: EmissionsTable::from_records(records),
            ..Datasets::default()
        }
    }

    #[test]
    fn test_panels_follow_selection() {
        let data = datasets();
        let mut selection = Selection::new(2000..=2020, DEFAULT_MAX_SELECTED);
        let dashboard = Dashboard::new(&data, &selection);
        let panels = dashboard.panels();
        assert_eq!(panels.len(), 1);
        assert!(panels[0].svg.contains("No data for this selection"));

        selection.apply(Event::ToggleCountry("DEU".into()));
        selection.apply(Event::ToggleCountry("FRA".into()));
        selection.apply(Event::Focus("DEU".into()));
        let dashboard = Dashboard::new(&data, &selection);
        let ids: Vec<&str> = dashboard.panels().iter().map(|p| p.id).collect();
        assert_eq!(ids, ["emissions", "sources"]);
        assert_eq!(dashboard.source_mix().len(), 3);
    }

    #[test]
    fn test_indexed_series() {
        let data = datasets();
        let mut selection = Selection::new(2000..=2020, DEFAULT_MAX_SELECTED);
        selection.apply(Event::ToggleCountry("DEU".into()));
        selection.apply(Event::SetIndexed(true));
        let dashboard = Dashboard::new(&data, &selection);
        let series = dashboard.metric_series();
        assert_eq!(series[0].value_at(2010), Some(150.0));
        assert_eq!(series[0].value_at(2000), Some(100.0));
        // Summary rows stay in raw units
        assert_eq!(dashboard.summary()[0].latest_text(), "120 (2020)");
    }

    #[test]
    fn test_unknown_country_degrades_to_empty() {
        let data = datasets();
        let mut selection = Selection::new(2000..=2020, DEFAULT_MAX_SELECTED);
        selection.apply(Event::ToggleCountry("XYZ".into()));
        let dashboard = Dashboard::new(&data, &selection);
        assert!(dashboard.metric_series()[0].is_empty());
        assert_eq!(dashboard.country_name("XYZ"), "XYZ");
        assert_eq!(dashboard.country_name("fra"), "France");
    }

    #[test]
    fn test_selection_keys_follow_data_spelling() {
        let data = datasets();
        let mut selection = Selection::new(2000..=2020, DEFAULT_MAX_SELECTED);
        selection.apply(Event::ToggleCountry("deu".into()));
        assert!(selection.is_selected("DEU"));

        let dashboard = Dashboard::new(&data, &selection);
        assert_eq!(dashboard.selected_keys(), ["DEU"]);
        let series = dashboard.metric_series();
        assert_eq!(series[0].key, "DEU");
        assert_eq!(series[0].len(), 3);
        assert_eq!(dashboard.source_mix().len(), 3);
        assert!(dashboard
            .metric_panel()
            .svg
            .contains("class=\"series selected\" data-key=\"DEU\""));
    }

    #[test]
    fn test_map_values_use_selected_year() {
        let data = datasets();
        let mut selection = Selection::new(2000..=2020, DEFAULT_MAX_SELECTED);
        selection.apply(Event::SetYear(2010));
        let dashboard = Dashboard::new(&data, &selection);
        assert_eq!(dashboard.map_values().get("FRA"), Some(&75.0));
    }
}
