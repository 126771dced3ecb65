//! Shared library for `carbon-atlas`
//! Contains data loading, chart rendering and dashboard assembly used by the CLI

pub mod core;
pub mod logger;

pub use crate::core::{config, get_version};
