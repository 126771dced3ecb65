//! Standalone SVG export
//!
//! Writes every chart panel of a dashboard as `<id>.svg` into a directory.
//! The files keep their `<title>` tooltips so they stay readable without the
//! dashboard page.

use crate::core::dashboard::{Dashboard, ReportGenerator};
use crate::info;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// SVG file exporter
pub struct SvgReporter;

impl SvgReporter {
    /// Create a new SVG exporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Write each panel into `dir` and return the written paths
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or a file cannot
    /// be written.
    pub fn write_all(&self, ctx: &Dashboard, dir: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for panel in ctx.panels() {
            let path = dir.join(format!("{}.svg", panel.id));
            fs::write(&path, &panel.svg)?;
            info!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

impl Default for SvgReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SvgReporter {
    fn generate(&self, ctx: &Dashboard, output_path: &Path) -> Result<(), Box<dyn Error>> {
        self.write_all(ctx, output_path).map(|_| ())
    }

    /// Every panel's markup, one document after another
    fn render(&self, ctx: &Dashboard) -> Result<String, Box<dyn Error>> {
        Ok(ctx
            .panels()
            .into_iter()
            .map(|p| p.svg)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
