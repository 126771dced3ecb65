//! Dashboard command handler
//!
//! Loads the configured datasets, builds the selection and writes the
//! dashboard in the requested format.

use super::{build_selection, load_all, print_summary};
use crate::args::SelectionArgs;
use carbon_atlas::config::Config;
use carbon_atlas::core::chart::{BarMode, Frame, Projection};
use carbon_atlas::core::dashboard::{
    Dashboard, HtmlReporter, MarkdownReporter, ReportFormat, ReportGenerator, SvgReporter,
};
use carbon_atlas::{error, info};
use std::path::{Path, PathBuf};

/// Options of the dashboard command besides the selection
pub struct DashboardOptions<'a> {
    pub format: &'a str,
    pub output: Option<&'a Path>,
    pub projection: &'a str,
    pub percent: bool,
}

/// Run the dashboard command.
pub fn run(
    selection_args: &SelectionArgs,
    options: &DashboardOptions,
    config: &Config,
) -> Result<(), String> {
    let format: ReportFormat = options.format.parse().map_err(|e| format!("✗ {e}"))?;
    let projection: Projection = options.projection.parse().map_err(|e| format!("✗ {e}"))?;

    let loaded = load_all(config)?;
    let selection = build_selection(selection_args, &loaded.data, config)?;

    let frame = Frame::new(
        f64::from(config.chart.width.max(200)),
        f64::from(config.chart.height.max(150)),
    );
    let bar_mode = if options.percent {
        BarMode::Percent
    } else {
        BarMode::Absolute
    };
    let mut dashboard = Dashboard::new(&loaded.data, &selection)
        .with_frame(frame)
        .with_projection(projection)
        .with_bar_mode(bar_mode);
    if let Some(map) = &loaded.map {
        dashboard = dashboard.with_map(map);
    }

    let output = resolve_output_path(options.output, format, config);
    write_dashboard(&dashboard, format, &output)?;

    let countries = if selection.countries().is_empty() {
        "none".to_string()
    } else {
        selection.countries().join(", ")
    };
    let range = selection.range();
    print_summary(
        "Summary",
        &[
            ("Metric:", selection.metric().label().to_string()),
            ("Countries:", countries),
            ("Years:", format!("{}–{}", range.start(), range.end())),
            ("Map year:", selection.year().to_string()),
            ("Panels:", dashboard.panels().len().to_string()),
            ("Format:", format.to_string()),
        ],
    );
    println!("\n✓ Dashboard written: {}", output.display());
    Ok(())
}

/// Output path: the explicit one, else `dashboard.<ext>` in the reports dir
fn resolve_output_path(output: Option<&Path>, format: ReportFormat, config: &Config) -> PathBuf {
    if let Some(path) = output {
        return path.to_path_buf();
    }
    let dir = PathBuf::from(&config.paths.reports_dir);
    if format.is_directory() {
        dir.join("dashboard")
    } else {
        dir.join(format!("dashboard.{}", format.extension()))
    }
}

fn write_dashboard(
    dashboard: &Dashboard,
    format: ReportFormat,
    output: &Path,
) -> Result<(), String> {
    let fail = |e: Box<dyn std::error::Error>| {
        error!("Dashboard generation failed for {}: {e}", output.display());
        format!("✗ Failed to write {}: {e}", output.display())
    };

    if format.is_directory() {
        let written = SvgReporter::new().write_all(dashboard, output).map_err(fail)?;
        info!("Wrote {} SVG files to {}", written.len(), output.display());
        return Ok(());
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("✗ Failed to create {}: {e}", parent.display()))?;
    }
    let generator: Box<dyn ReportGenerator> = match format {
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
        _ => Box::new(HtmlReporter::new()),
    };
    generator.generate(dashboard, output).map_err(fail)?;
    info!("Wrote {format} dashboard to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_output_path() {
        let mut config = Config::from_defaults();
        config.paths.reports_dir = "/tmp/reports".to_string();

        assert_eq!(
            resolve_output_path(None, ReportFormat::Html, &config),
            PathBuf::from("/tmp/reports/dashboard.html")
        );
        assert_eq!(
            resolve_output_path(None, ReportFormat::Markdown, &config),
            PathBuf::from("/tmp/reports/dashboard.md")
        );
        assert_eq!(
            resolve_output_path(None, ReportFormat::Svg, &config),
            PathBuf::from("/tmp/reports/dashboard")
        );
        assert_eq!(
            resolve_output_path(Some(Path::new("out.html")), ReportFormat::Html, &config),
            PathBuf::from("out.html")
        );
    }
}
