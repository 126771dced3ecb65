//! SVG chart rendering
//!
//! Renderers turn typed series into standalone `<svg>` markup. Every
//! interactive element carries `data-key` (selection) and `data-tip*`
//! (tooltip) attributes that the dashboard page script reads; the markup
//! also embeds `<title>` children so the SVG stays readable on its own.

pub mod axis;
pub mod bar;
pub mod line;
pub mod map;
pub mod palette;
pub mod scale;
pub mod svg;
pub mod tooltip;

pub use bar::{BarMode, StackedBarChart};
pub use line::LineChart;
pub use map::{ChoroplethMap, MapFeature, Projection, WorldMap};
pub use scale::{BandScale, LinearScale, QuantizeScale};
pub use tooltip::{Placement, Tooltip};

use axis::PlotArea;
use svg::{attr, num, SvgWriter};

/// Space reserved around the plot area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    /// Top margin (title)
    pub top: f64,
    /// Right margin (legend)
    pub right: f64,
    /// Bottom margin (x axis)
    pub bottom: f64,
    /// Left margin (y axis)
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 36.0,
            right: 150.0,
            bottom: 36.0,
            left: 64.0,
        }
    }
}

/// Outer size of a chart and its margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Total width
    pub width: f64,
    /// Total height
    pub height: f64,
    /// Margins around the plot area
    pub margin: Margin,
}

impl Frame {
    /// Frame with default margins
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: Margin::default(),
        }
    }

    /// Plot area inside the margins (never inverted)
    #[must_use]
    pub fn plot_area(&self) -> PlotArea {
        let left = self.margin.left;
        let top = self.margin.top;
        PlotArea {
            left,
            top,
            right: (self.width - self.margin.right).max(left + 1.0),
            bottom: (self.height - self.margin.bottom).max(top + 1.0),
        }
    }

    /// Viewport size for tooltip placement
    #[must_use]
    pub const fn viewport(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(760.0, 380.0)
    }
}

/// Chart title across the top
pub(crate) fn title(svg: &mut SvgWriter, frame: &Frame, text: &str) {
    svg.text(
        "text",
        &[
            attr("class", "chart-title"),
            attr("x", num(frame.margin.left)),
            attr("y", num(frame.margin.top / 2.0 + 5.0)),
            attr("font-size", 14),
            attr("font-weight", "bold"),
            attr("fill", "#222"),
        ],
        text,
    );
}

/// Placeholder shown when there is nothing to draw
pub(crate) fn no_data(svg: &mut SvgWriter, frame: &Frame, message: &str) {
    let area = frame.plot_area();
    svg.leaf(
        "rect",
        &[
            attr("class", "no-data"),
            attr("x", num(area.left)),
            attr("y", num(area.top)),
            attr("width", num(area.right - area.left)),
            attr("height", num(area.bottom - area.top)),
            attr("fill", "#f7f7f7"),
            attr("stroke", "#ddd"),
        ],
    );
    svg.text(
        "text",
        &[
            attr("class", "no-data-label"),
            attr("x", num((area.left + area.right) / 2.0)),
            attr("y", num((area.top + area.bottom) / 2.0)),
            attr("text-anchor", "middle"),
            attr("fill", "#888"),
        ],
        message,
    );
}

/// One legend entry
pub(crate) struct LegendItem<'a> {
    pub key: &'a str,
    pub label: &'a str,
    pub color: &'a str,
}

/// Vertical legend in the right margin
pub(crate) fn legend(svg: &mut SvgWriter, frame: &Frame, items: &[LegendItem]) {
    let x = frame.width - frame.margin.right + 16.0;
    svg.open("g", &[attr("class", "legend")]);
    for (i, item) in items.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y = frame.margin.top + 18.0 * i as f64;
        svg.open(
            "g",
            &[
                attr("class", "legend-item"),
                attr("data-key", item.key),
                attr("transform", format!("translate({},{})", num(x), num(y))),
            ],
        );
        svg.leaf(
            "rect",
            &[
                attr("width", 12),
                attr("height", 12),
                attr("fill", item.color),
            ],
        );
        svg.text(
            "text",
            &[attr("x", 18), attr("y", 10), attr("fill", "#333")],
            item.label,
        );
        svg.close();
    }
    svg.close();
}
