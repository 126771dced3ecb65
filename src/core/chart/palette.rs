//! Colour palettes

/// Categorical colours for line series (d3 `schemeCategory10`)
pub const CATEGORICAL: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Sequential reds for the choropleth, light to dark
pub const SEQUENTIAL_REDS: [&str; 7] = [
    "#fee5d9", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d", "#99000d",
];

/// Fill for countries without a value
pub const NO_DATA: &str = "#d9d9d9";

/// Colour of the `index`-th categorical series (wraps around)
#[must_use]
pub const fn category_color(index: usize) -> &'static str {
    CATEGORICAL[index % CATEGORICAL.len()]
}

/// Fixed colour per emission source label, falling back to the categorical palette
#[must_use]
pub fn source_color(label: &str, index: usize) -> &'static str {
    match label {
        "Coal" => "#4d4d4d",
        "Oil" => "#8c510a",
        "Gas" => "#1f78b4",
        "Cement" => "#9ecae1",
        "Flaring" => "#ff7f00",
        "Other industry" => "#6a3d9a",
        _ => category_color(index),
    }
}
