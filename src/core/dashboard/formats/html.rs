//! HTML dashboard generator
//!
//! Renders a self-contained page: every chart is inline SVG, and a small
//! embedded script shows the precomputed tooltips on hover and toggles the
//! selection highlight when a line, country or summary row is clicked.

use crate::core::dashboard::{ChartPanel, Dashboard, ReportGenerator};
use askama::Template;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Summary row with every cell preformatted
struct RowView {
    key: String,
    name: String,
    latest: String,
    change: String,
    change_class: &'static str,
    peak: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardPage<'a> {
    title: &'a str,
    subtitle: &'a str,
    panels: &'a [ChartPanel],
    rows: &'a [RowView],
    selected_json: &'a str,
    version: &'a str,
}

/// HTML dashboard generator
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn rows(ctx: &Dashboard) -> Vec<RowView> {
        ctx.summary()
            .into_iter()
            .map(|row| RowView {
                change_class: match row.change {
                    Some(c) if c > 0.0 => "up",
                    Some(c) if c < 0.0 => "down",
                    _ => "flat",
                },
                latest: row.latest_text(),
                change: row.change_text(),
                peak: row.peak_text(),
                key: row.key,
                name: row.name,
            })
            .collect()
    }

    fn subtitle(ctx: &Dashboard) -> String {
        let selection = ctx.selection;
        let mut parts = vec![format!(
            "{} ({})",
            selection.metric().label(),
            selection.metric().unit()
        )];
        if let Some(name) = ctx.indicator_name() {
            parts.push(name);
        }
        parts.push(format!("map year {}", selection.year()));
        if selection.indexed() {
            parts.push(format!("indexed to {}", selection.range().start()));
        }
        parts.join(" · ")
    }

    /// Selected keys as a JSON array safe to embed in a `<script>` element
    fn selected_json(ctx: &Dashboard) -> Result<String, serde_json::Error> {
        Ok(serde_json::to_string(&ctx.selected_keys())?.replace("</", "<\\/"))
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn generate(&self, ctx: &Dashboard, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &Dashboard) -> Result<String, Box<dyn Error>> {
        let title = ctx.title();
        let subtitle = Self::subtitle(ctx);
        let panels = ctx.panels();
        let rows = Self::rows(ctx);
        let selected_json = Self::selected_json(ctx)?;
        let page = DashboardPage {
            title: &title,
            subtitle: &subtitle,
            panels: &panels,
            rows: &rows,
            selected_json: &selected_json,
            version: crate::get_version(),
        };
        Ok(page.render()?)
    }
}
