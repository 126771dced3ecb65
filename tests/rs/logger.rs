//! Integration tests for logger behavior.

use carbon_atlas::logger::{
    close_file_logging, enable_debug, init_file_logging, set_level, set_level_from_str,
    Level,
};
use carbon_atlas::{debug, error, info, warn};

#[test]
fn level_parse_accepts_valid() {
    assert!(set_level_from_str("error"));
    assert!(set_level_from_str("warn"));
    assert!(set_level_from_str("info"));
    assert!(set_level_from_str("debug"));
}

#[test]
fn level_parse_rejects_invalid() {
    assert!(!set_level_from_str("invalid"));
    assert!(!set_level_from_str(""));
}

#[test]
fn logs_do_not_panic() {
    set_level(Level::Debug);
    info!("info integration");
    warn!("warn integration");
    error!("error integration");
    debug!("debug integration");
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_writes_tagged_lines() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("logs").join("carbonatlas.log");

    set_level(Level::Debug);
    enable_debug();
    assert!(init_file_logging(&path));
    error!("map file missing");
    close_file_logging();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("[ERROR] map file missing"));
}
