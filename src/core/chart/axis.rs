//! Axes and number formatting

use super::scale::LinearScale;
use super::svg::{attr, num, SvgWriter};

/// Compact label for axis ticks: `950`, `1.2k`, `3.4M`, `5.6B`, `7.8T`
#[must_use]
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e12 {
        (value / 1e12, "T")
    } else if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "k")
    } else {
        (value, "")
    };
    format!("{}{suffix}", trim_decimals(scaled, 1))
}

/// Full-precision label for tooltips and tables, with thousands separators
#[must_use]
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    if value.abs() < 1000.0 {
        return trim_decimals(value, 2);
    }
    #[allow(clippy::cast_possible_truncation)]
    let whole = value.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// Format a percentage with one decimal and an explicit sign
#[must_use]
pub fn format_change(percent: f64) -> String {
    if percent >= 0.0 {
        format!("+{percent:.1}%")
    } else {
        format!("{percent:.1}%")
    }
}

fn trim_decimals(value: f64, decimals: usize) -> String {
    let mut s = format!("{value:.decimals$}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Horizontal extent of the plot area, used for grid lines
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    /// Left edge
    pub left: f64,
    /// Right edge
    pub right: f64,
    /// Top edge
    pub top: f64,
    /// Bottom edge
    pub bottom: f64,
}

/// Draw a left value axis with grid lines across the plot area
pub fn y_axis(
    svg: &mut SvgWriter,
    scale: &LinearScale,
    area: PlotArea,
    label: &str,
    tick_labels: &[(f64, String)],
) {
    svg.open("g", &[attr("class", "axis axis-y")]);
    for (value, text) in tick_labels {
        let y = scale.map(*value);
        svg.leaf(
            "line",
            &[
                attr("class", "grid"),
                attr("x1", num(area.left)),
                attr("x2", num(area.right)),
                attr("y1", num(y)),
                attr("y2", num(y)),
                attr("stroke", "#e0e0e0"),
            ],
        );
        svg.text(
            "text",
            &[
                attr("x", num(area.left - 6.0)),
                attr("y", num(y + 4.0)),
                attr("text-anchor", "end"),
                attr("fill", "#555"),
            ],
            text,
        );
    }
    if !label.is_empty() {
        let mid = (area.top + area.bottom) / 2.0;
        svg.text(
            "text",
            &[
                attr("class", "axis-label"),
                attr(
                    "transform",
                    format!("translate({},{}) rotate(-90)", num(area.left - 48.0), num(mid)),
                ),
                attr("text-anchor", "middle"),
                attr("fill", "#333"),
            ],
            label,
        );
    }
    svg.close();
}

/// Draw a bottom axis with the given labelled tick positions
pub fn x_axis(svg: &mut SvgWriter, area: PlotArea, ticks: &[(f64, String)]) {
    svg.open("g", &[attr("class", "axis axis-x")]);
    svg.leaf(
        "line",
        &[
            attr("x1", num(area.left)),
            attr("x2", num(area.right)),
            attr("y1", num(area.bottom)),
            attr("y2", num(area.bottom)),
            attr("stroke", "#888"),
        ],
    );
    for (x, text) in ticks {
        svg.leaf(
            "line",
            &[
                attr("x1", num(*x)),
                attr("x2", num(*x)),
                attr("y1", num(area.bottom)),
                attr("y2", num(area.bottom + 5.0)),
                attr("stroke", "#888"),
            ],
        );
        svg.text(
            "text",
            &[
                attr("x", num(*x)),
                attr("y", num(area.bottom + 18.0)),
                attr("text-anchor", "middle"),
                attr("fill", "#555"),
            ],
            text,
        );
    }
    svg.close();
}

/// Value ticks of a scale labelled with [`format_compact`]
#[must_use]
pub fn value_ticks(scale: &LinearScale, count: usize) -> Vec<(f64, String)> {
    scale
        .ticks(count)
        .into_iter()
        .map(|v| (v, format_compact(v)))
        .collect()
}

/// Whole-year ticks of a year scale, positioned in pixels
#[must_use]
pub fn year_ticks(scale: &LinearScale, count: usize) -> Vec<(f64, String)> {
    #[allow(clippy::cast_possible_truncation)]
    let ticks = scale
        .ticks(count)
        .into_iter()
        .filter(|v| (v - v.round()).abs() < 1e-9)
        .map(|v| (scale.map(v), format!("{}", v.round() as i64)))
        .collect();
    ticks
}
