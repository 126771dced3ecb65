//! Dashboard output formats
//!
//! Provides exporters for a self-contained HTML page, standalone SVG files
//! and a Markdown data summary.

pub mod html;
pub mod markdown;
pub mod svg;

pub use html::HtmlReporter;
pub use markdown::MarkdownReporter;
pub use svg::SvgReporter;

use std::fmt;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Single HTML page with inline SVG and the interaction script
    #[default]
    Html,
    /// One SVG file per chart in an output directory
    Svg,
    /// Markdown summary and data tables
    Markdown,
}

impl ReportFormat {
    /// File extension for this format; SVG output is a directory
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Svg => "",
            Self::Markdown => "md",
        }
    }

    /// Whether the output path names a directory rather than a file
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Svg)
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Ok(Self::Html),
            "svg" => Ok(Self::Svg),
            "md" | "markdown" => Ok(Self::Markdown),
            _ => Err(format!("Unknown report format: {s}")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html => write!(f, "html"),
            Self::Svg => write!(f, "svg"),
            Self::Markdown => write!(f, "markdown"),
        }
    }
}
