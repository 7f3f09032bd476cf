//! Integration tests for configuration loading and validation
//!
//! Every test here holds ENV_MUTEX: environment overrides apply to every
//! load, so tests touching the environment must not interleave.

use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use vehicle_lookup::config::{load_config, load_config_or_default};
use vehicle_lookup::domain::MergeMode;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn lock_env() -> std::sync::MutexGuard<'static, ()> {
    ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
}

fn cleanup_env_vars() {
    std::env::remove_var("VEHICLE_LOOKUP_SERVER_PORT");
    std::env::remove_var("VEHICLE_LOOKUP_LOOKUP_MERGE_MODE");
    std::env::remove_var("VEHICLE_LOOKUP_CACHE_TTL_SECONDS");
    std::env::remove_var("VEHICLE_LOOKUP_PORTAL_USERNAME");
    std::env::remove_var("VEHICLE_LOOKUP_PORTAL_PASSWORD");
    std::env::remove_var("TEST_PORTAL_PASSWORD");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = lock_env();
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
name = "Fleet Lookup"
log_level = "debug"

[server]
host = "127.0.0.1"
port = 9100
cors_enabled = false
shutdown_grace_seconds = 3

[portal]
base_url = "https://portal.example.com/"
username = "fleet"
password = "s3cret"
timeout_seconds = 5

[portal.form]
data_container_id = "VehicleData"

[widget]
url_template = "https://widget.example.com/book?vrm={vrm}"
marker = "Details"
timeout_seconds = 6

[lookup]
budget_seconds = 12
merge_mode = "merged"

[cache]
ttl_seconds = 600
max_entries = 50

[logging]
local_enabled = true
local_path = "/tmp/vehicle-lookup"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.name, "Fleet Lookup");
    assert_eq!(config.server.bind_address(), "127.0.0.1:9100");
    assert!(!config.server.cors_enabled);
    assert_eq!(config.portal.username.as_deref(), Some("fleet"));
    assert_eq!(
        config
            .portal
            .password
            .as_ref()
            .map(|p| p.expose_secret().as_ref().to_string()),
        Some("s3cret".to_string())
    );
    assert_eq!(config.portal.form.data_container_id, "VehicleData");
    // unspecified form fields keep their defaults
    assert_eq!(config.portal.form.login_action, "./Login.aspx");
    assert_eq!(config.widget.marker, "Details");
    assert_eq!(config.lookup.merge_mode, MergeMode::Merged);
    assert_eq!(config.cache.ttl_seconds, 600);
    assert_eq!(config.cache.max_entries, 50);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_env_substitution_and_overrides() {
    let _lock = lock_env();
    cleanup_env_vars();
    std::env::set_var("TEST_PORTAL_PASSWORD", "from-env");
    std::env::set_var("VEHICLE_LOOKUP_SERVER_PORT", "8123");
    std::env::set_var("VEHICLE_LOOKUP_LOOKUP_MERGE_MODE", "merged");

    let file = write_config(
        r#"
[portal]
username = "fleet"
password = "${TEST_PORTAL_PASSWORD}"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(
        config
            .portal
            .password
            .as_ref()
            .map(|p| p.expose_secret().as_ref().to_string()),
        Some("from-env".to_string())
    );
    assert_eq!(config.server.port, 8123);
    assert_eq!(config.lookup.merge_mode, MergeMode::Merged);

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable_is_error() {
    let _lock = lock_env();
    cleanup_env_vars();

    let file = write_config(
        r#"
[portal]
password = "${TEST_PORTAL_PASSWORD}"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_PORTAL_PASSWORD"));
}

#[test]
fn test_timeouts_must_fit_budget() {
    let _lock = lock_env();
    cleanup_env_vars();

    let file = write_config(
        r#"
[widget]
timeout_seconds = 20

[lookup]
budget_seconds = 15
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("widget.timeout_seconds"));
}

#[test]
fn test_missing_file() {
    let _lock = lock_env();
    cleanup_env_vars();

    assert!(load_config("/nonexistent/vehicle-lookup.toml").is_err());

    let config = load_config_or_default("/nonexistent/vehicle-lookup.toml").unwrap();
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.cache.ttl_seconds, 3600);
    assert_eq!(config.cache.max_entries, 5000);
    assert_eq!(config.widget.marker, "VrmDetails");
}
