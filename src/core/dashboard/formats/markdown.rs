//! Markdown summary generator
//!
//! Produces the summary rows and the data behind every chart as Markdown
//! tables, for reading in a repository or pasting into notes.

use crate::core::chart::axis::format_value;
use crate::core::dashboard::{Dashboard, ReportGenerator};
use crate::core::data::{Series, StackedYear};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Embedded Markdown template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/dashboard.md");

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &Dashboard) -> String {
        let selection = ctx.selection;
        let metric = selection.metric();
        let range = selection.range();

        let keys = ctx.selected_keys();
        let countries = if keys.is_empty() {
            "none".to_string()
        } else {
            keys.iter()
                .map(|k| format!("{} ({k})", cell(&ctx.country_name(k))))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let focus_heading = selection
            .focus()
            .map(|k| format!(": {}", ctx.country_name(k)))
            .unwrap_or_default();

        let mut output = MARKDOWN_TEMPLATE.to_string();
        output = output.replace("{{title}}", &ctx.title());
        output = output.replace("{{metric}}", metric.label());
        output = output.replace("{{unit}}", metric.unit());
        output = output.replace("{{range}}", &format!("{}–{}", range.start(), range.end()));
        output = output.replace("{{year}}", &selection.year().to_string());
        output = output.replace("{{countries}}", &countries);
        output = output.replace(
            "{{indicator}}",
            &ctx.indicator_name().unwrap_or_else(|| "none".to_string()),
        );
        output = output.replace("{{summary_rows}}", &Self::summary_rows(ctx));
        output = output.replace("{{metric_table}}", &series_table(&ctx.metric_series()));
        output = output.replace("{{focus_heading}}", &focus_heading);
        output = output.replace("{{sources_table}}", &sources_table(&ctx.source_mix()));

        let indicator_table = if selection.indicator().is_some() {
            series_table(&ctx.indicator_series())
        } else {
            "_No indicator selected._".to_string()
        };
        output = output.replace("{{indicator_table}}", &indicator_table);

        output
    }

    /// Summary table body, one row per selected country
    fn summary_rows(ctx: &Dashboard) -> String {
        let rows = ctx.summary();
        if rows.is_empty() {
            return "| _No countries selected_ | | | |".to_string();
        }
        let mut md = String::new();
        for row in rows {
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} |",
                cell(&row.name),
                row.latest_text(),
                row.change_text(),
                row.peak_text()
            );
        }
        md.trim_end().to_string()
    }
}

/// Escape a table cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Year by country table for a set of series
fn series_table(series: &[Series]) -> String {
    let years: BTreeSet<i32> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.year))
        .collect();
    if years.is_empty() {
        return "_No data for this selection._".to_string();
    }

    let mut md = String::from("| Year |");
    for s in series {
        let _ = write!(md, " {} |", cell(&s.label));
    }
    md.push_str("\n|---|");
    md.push_str(&"---:|".repeat(series.len()));
    for year in years {
        let _ = write!(md, "\n| {year} |");
        for s in series {
            let value = s.value_at(year).map(format_value).unwrap_or_default();
            let _ = write!(md, " {value} |");
        }
    }
    md
}

/// Source breakdown table, one row per year
fn sources_table(bars: &[StackedYear]) -> String {
    let Some(first) = bars.first() else {
        return "_No source breakdown available._".to_string();
    };

    let mut md = String::from("| Year |");
    for segment in &first.segments {
        let _ = write!(md, " {} |", segment.label);
    }
    md.push_str(" Total |\n|---|");
    md.push_str(&"---:|".repeat(first.segments.len() + 1));
    for bar in bars {
        let _ = write!(md, "\n| {} |", bar.year);
        for segment in &bar.segments {
            let _ = write!(
                md,
                " {} ({:.1}%) |",
                format_value(segment.value),
                segment.percent
            );
        }
        let _ = write!(md, " {} |", format_value(bar.total()));
    }
    md
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(&self, ctx: &Dashboard, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &Dashboard) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(ctx))
    }
}
