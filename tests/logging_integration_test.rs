//! Integration tests for logging functionality
//!
//! Installing a global subscriber can only happen once per process, so the
//! initialization checks live in a single test.

use docship::config::LoggingConfig;
use docship::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_invalid_level_rejected_before_install() {
    let config = LoggingConfig::default();
    let err = init_logging("loud", &config).err().unwrap();
    assert!(err.to_string().contains("Invalid log level"));
}

#[test]
fn test_file_logging_writes_json() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("info", &config).unwrap();
    assert!(log_path.is_dir());

    // The default filter only admits the `docship` target
    tracing::info!(target: "docship", record_id = "42", "Export completed");
    tracing::warn!(target: "docship::core::upload", attempt = 2, "Retrying upload");
    tracing::info!(target: "other_crate", "Filtered out");

    // A second subscriber cannot be installed
    assert!(init_logging("info", &LoggingConfig::default()).is_err());

    // Flush the non-blocking writer
    drop(guard);

    let contents = std::fs::read_to_string(log_path.join("docship.log")).unwrap();
    let lines: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert!(lines
        .iter()
        .any(|l| l["fields"]["message"] == "Export completed" && l["fields"]["record_id"] == "42"));
    assert!(lines
        .iter()
        .any(|l| l["fields"]["message"] == "Retrying upload" && l["level"] == "WARN"));
    assert!(!contents.contains("Filtered out"));
}
