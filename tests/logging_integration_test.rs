//! Integration tests for logging functionality

use tempfile::TempDir;
use vehicle_lookup::config::LoggingConfig;
use vehicle_lookup::logging::init_logging;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.local_path, "./logs");
}

#[test]
fn test_file_logging_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("nested").join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };
    assert!(!log_path.exists());

    let guard = init_logging("debug", &config).unwrap();
    tracing::info!("logging integration test");
    drop(guard);

    assert!(log_path.is_dir());
}

#[test]
fn test_invalid_level_rejected() {
    let result = init_logging("verbose", &LoggingConfig::default());
    assert!(result.is_err());
}

#[test]
fn test_repeated_init_is_harmless() {
    let config = LoggingConfig::default();
    let _first = init_logging("info", &config).unwrap();
    let _second = init_logging("warn", &config).unwrap();
}
