//! Multi-series line chart

use super::axis::{format_value, value_ticks, x_axis, y_axis, year_ticks};
use super::palette::category_color;
use super::scale::LinearScale;
use super::svg::{attr, num, SvgWriter};
use super::tooltip::Tooltip;
use super::{legend, no_data, title, Frame, LegendItem};
use crate::core::data::{extent, Series};
use std::fmt::Write;

/// Line chart of year series, one line per series
#[derive(Debug, Clone)]
pub struct LineChart {
    /// Size and margins
    pub frame: Frame,
    /// Title drawn above the plot
    pub title: String,
    /// Y axis caption
    pub y_label: String,
    /// Unit appended to tooltip values
    pub unit: String,
    /// Keys of selected series; others are dimmed when non-empty
    pub selected: Vec<String>,
}

impl LineChart {
    /// Create a chart with the default frame
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            frame: Frame::default(),
            title: title.into(),
            y_label: String::new(),
            unit: String::new(),
            selected: Vec::new(),
        }
    }

    /// Set the frame
    #[must_use]
    pub const fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    /// Set the y axis caption and tooltip unit
    #[must_use]
    pub fn with_axis(mut self, y_label: impl Into<String>, unit: impl Into<String>) -> Self {
        self.y_label = y_label.into();
        self.unit = unit.into();
        self
    }

    /// Mark series keys as selected
    #[must_use]
    pub fn with_selected(mut self, selected: &[String]) -> Self {
        self.selected = selected.to_vec();
        self
    }

    fn series_class(&self, key: &str) -> &'static str {
        if self.selected.is_empty() {
            "series"
        } else if self.selected.iter().any(|k| k == key) {
            "series selected"
        } else {
            "series dimmed"
        }
    }

    /// Render to SVG markup. Empty series are skipped; with nothing left a
    /// "No data" placeholder is drawn.
    #[must_use]
    pub fn render(&self, series: &[Series]) -> String {
        let frame = &self.frame;
        let mut svg = SvgWriter::new(frame.width, frame.height, "chart line-chart");
        title(&mut svg, frame, &self.title);

        let drawn: Vec<(usize, &Series)> = series
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_empty())
            .collect();
        if drawn.is_empty() {
            no_data(&mut svg, frame, "No data for this selection");
            return svg.finish();
        }

        let area = frame.plot_area();
        let years = drawn
            .iter()
            .flat_map(|(_, s)| s.points.iter().map(|p| f64::from(p.year)));
        let values = drawn
            .iter()
            .flat_map(|(_, s)| s.points.iter().map(|p| p.value));
        let (y0, y1) = extent(years).unwrap_or((0.0, 1.0));
        let (v0, v1) = extent(values).unwrap_or((0.0, 1.0));
        let v0 = if v0 >= 0.0 { 0.0 } else { v0 };

        let x = LinearScale::new((y0, y1), (area.left, area.right));
        let y = LinearScale::new((v0, v1), (area.bottom, area.top)).nice(5);

        y_axis(&mut svg, &y, area, &self.y_label, &value_ticks(&y, 5));
        x_axis(&mut svg, area, &year_ticks(&x, 8));

        for (idx, s) in &drawn {
            let color = category_color(*idx);
            svg.open(
                "g",
                &[
                    attr("class", self.series_class(&s.key)),
                    attr("data-key", &s.key),
                ],
            );
            svg.leaf(
                "path",
                &[
                    attr("class", "line"),
                    attr("d", path_data(s, &x, &y)),
                    attr("fill", "none"),
                    attr("stroke", color),
                    attr("stroke-width", 2),
                ],
            );
            for p in &s.points {
                let (px, py) = (x.map(f64::from(p.year)), y.map(p.value));
                let tip = Tooltip::new([
                    s.label.clone(),
                    format!("{}: {} {}", p.year, format_value(p.value), self.unit)
                        .trim_end()
                        .to_string(),
                ]);
                let [tip_text, tip_x, tip_y] = tip.attrs((px, py), frame.viewport());
                svg.open(
                    "circle",
                    &[
                        attr("class", "point"),
                        attr("cx", num(px)),
                        attr("cy", num(py)),
                        attr("r", 3),
                        attr("fill", color),
                        attr("data-key", &s.key),
                        attr("data-year", p.year),
                        tip_text,
                        tip_x,
                        tip_y,
                    ],
                );
                svg.text("title", &[], &tip.text());
                svg.close();
            }
            svg.close();
        }

        let items: Vec<LegendItem> = drawn
            .iter()
            .map(|(idx, s)| LegendItem {
                key: &s.key,
                label: &s.label,
                color: category_color(*idx),
            })
            .collect();
        legend(&mut svg, frame, &items);

        svg.finish()
    }
}

/// `M x,y L x,y ...` through every point of the series
fn path_data(series: &Series, x: &LinearScale, y: &LinearScale) -> String {
    let mut d = String::new();
    for (i, p) in series.points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(
            d,
            "{cmd}{},{} ",
            num(x.map(f64::from(p.year))),
            num(y.map(p.value))
        );
    }
    d.trim_end().to_string()
}
