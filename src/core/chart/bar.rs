//! Stacked bar chart of emission source shares

use super::axis::{format_value, value_ticks, x_axis, y_axis};
use super::palette::source_color;
use super::scale::{BandScale, LinearScale};
use super::svg::{attr, num, SvgWriter};
use super::tooltip::Tooltip;
use super::{legend, no_data, title, Frame, LegendItem};
use crate::core::data::StackedYear;

/// Bar height encodes absolute values or shares of 100%
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarMode {
    /// Segments stacked by raw value
    #[default]
    Absolute,
    /// Every bar normalised to 100%
    Percent,
}

/// Stacked bars, one per year
#[derive(Debug, Clone)]
pub struct StackedBarChart {
    /// Size and margins
    pub frame: Frame,
    /// Title drawn above the plot
    pub title: String,
    /// Height encoding
    pub mode: BarMode,
    /// Unit of raw values
    pub unit: String,
}

impl StackedBarChart {
    /// Create a chart with the default frame in absolute mode
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            frame: Frame::default(),
            title: title.into(),
            mode: BarMode::Absolute,
            unit: String::new(),
        }
    }

    /// Set the frame
    #[must_use]
    pub const fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    /// Set the height encoding
    #[must_use]
    pub const fn with_mode(mut self, mode: BarMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the unit of raw values
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    fn segment_height(&self, value: f64, percent: f64) -> f64 {
        match self.mode {
            BarMode::Absolute => value,
            BarMode::Percent => percent,
        }
    }

    /// Render to SVG markup
    #[must_use]
    pub fn render(&self, bars: &[StackedYear]) -> String {
        let frame = &self.frame;
        let mut svg = SvgWriter::new(frame.width, frame.height, "chart bar-chart");
        title(&mut svg, frame, &self.title);

        let bars: Vec<&StackedYear> = bars.iter().filter(|b| b.total() > 0.0).collect();
        if bars.is_empty() {
            no_data(&mut svg, frame, "No source breakdown available");
            return svg.finish();
        }

        let area = frame.plot_area();
        let top = match self.mode {
            BarMode::Absolute => bars.iter().map(|b| b.total()).fold(0.0, f64::max),
            BarMode::Percent => 100.0,
        };
        let y = LinearScale::new((0.0, top), (area.bottom, area.top)).nice(5);
        let x = BandScale::new(
            bars.iter().map(|b| b.year.to_string()).collect(),
            (area.left, area.right),
            0.2,
        );

        let y_label = match self.mode {
            BarMode::Absolute => self.unit.clone(),
            BarMode::Percent => "% of total".to_string(),
        };
        y_axis(&mut svg, &y, area, &y_label, &value_ticks(&y, 5));

        let label_every = bars.len().div_ceil(12).max(1);
        let ticks: Vec<(f64, String)> = bars
            .iter()
            .enumerate()
            .filter(|(i, _)| i % label_every == 0)
            .map(|(i, b)| (x.position_at(i) + x.bandwidth() / 2.0, b.year.to_string()))
            .collect();
        x_axis(&mut svg, area, &ticks);

        for (i, bar) in bars.iter().enumerate() {
            let bx = x.position_at(i);
            let mut base = 0.0;
            svg.open("g", &[attr("class", "bar"), attr("data-year", bar.year)]);
            for (j, segment) in bar.segments.iter().enumerate() {
                let h = self.segment_height(segment.value, segment.percent);
                if h <= 0.0 {
                    continue;
                }
                let (y_top, y_bottom) = (y.map(base + h), y.map(base));
                base += h;

                let amount = format!("{} {}", format_value(segment.value), self.unit);
                let tip = Tooltip::new([
                    bar.year.to_string(),
                    format!(
                        "{}: {} ({:.1}%)",
                        segment.label,
                        amount.trim_end(),
                        segment.percent
                    ),
                ]);
                let anchor = (bx + x.bandwidth() / 2.0, y_top);
                let [tip_text, tip_x, tip_y] = tip.attrs(anchor, frame.viewport());
                svg.open(
                    "rect",
                    &[
                        attr("class", "segment"),
                        attr("data-key", &segment.label),
                        attr("x", num(bx)),
                        attr("y", num(y_top)),
                        attr("width", num(x.bandwidth())),
                        attr("height", num(y_bottom - y_top)),
                        attr("fill", source_color(&segment.label, j)),
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

        let items: Vec<LegendItem> = bars[0]
            .segments
            .iter()
            .enumerate()
            .map(|(j, s)| LegendItem {
                key: &s.label,
                label: &s.label,
                color: source_color(&s.label, j),
            })
            .collect();
        legend(&mut svg, frame, &items);

        svg.finish()
    }
}
