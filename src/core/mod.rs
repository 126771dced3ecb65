//! Core module for data loading, charting and dashboard assembly

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;

pub use error::DataError;

/// Returns the current version of the `carbon-atlas` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
