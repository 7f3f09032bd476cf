//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ServiceConfig;
use super::secret::secret_string;
use crate::domain::errors::LookupError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix for environment variable overrides
const ENV_PREFIX: &str = "VEHICLE_LOOKUP";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ServiceConfig
/// 4. Applies environment variable overrides (VEHICLE_LOOKUP_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use vehicle_lookup::config::loader::load_config;
///
/// let config = load_config("vehicle-lookup.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ServiceConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LookupError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LookupError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: ServiceConfig = toml::from_str(&contents)
        .map_err(|e| LookupError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(config)
}

/// Loads configuration from a file if it exists, otherwise from defaults
///
/// Environment overrides and validation apply in both cases, so a
/// deployment can run entirely from `VEHICLE_LOOKUP_*` variables.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<ServiceConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::warn!(
        path = %path.display(),
        "Configuration file not found, using defaults and environment overrides"
    );
    finish(ServiceConfig::default())
}

fn finish(mut config: ServiceConfig) -> Result<ServiceConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        LookupError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| LookupError::Internal(e.to_string()))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        // Comment lines keep their placeholders untouched
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(LookupError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_var(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}")).ok()
}

fn env_parsed<T: std::str::FromStr>(section: &str, key: &str) -> Result<Option<T>> {
    match env_var(section, key) {
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            LookupError::Configuration(format!(
                "Invalid value '{raw}' for {ENV_PREFIX}_{section}_{key}"
            ))
        }),
        None => Ok(None),
    }
}

/// Applies environment variable overrides using VEHICLE_LOOKUP_* prefix
///
/// Environment variables follow the pattern: VEHICLE_LOOKUP_<SECTION>_<KEY>
/// For example: VEHICLE_LOOKUP_SERVER_PORT, VEHICLE_LOOKUP_PORTAL_PASSWORD
fn apply_env_overrides(config: &mut ServiceConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_var("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Server overrides
    if let Some(val) = env_var("SERVER", "HOST") {
        config.server.host = val;
    }
    if let Some(port) = env_parsed("SERVER", "PORT")? {
        config.server.port = port;
    }
    if let Some(enabled) = env_parsed("SERVER", "CORS_ENABLED")? {
        config.server.cors_enabled = enabled;
    }

    // Portal overrides
    if let Some(val) = env_var("PORTAL", "BASE_URL") {
        config.portal.base_url = val;
    }
    if let Some(val) = env_var("PORTAL", "USERNAME") {
        config.portal.username = Some(val);
    }
    if let Some(val) = env_var("PORTAL", "PASSWORD") {
        config.portal.password = Some(secret_string(val));
    }
    if let Some(secs) = env_parsed("PORTAL", "TIMEOUT_SECONDS")? {
        config.portal.timeout_seconds = secs;
    }

    // Widget overrides
    if let Some(val) = env_var("WIDGET", "URL_TEMPLATE") {
        config.widget.url_template = val;
    }
    if let Some(val) = env_var("WIDGET", "MARKER") {
        config.widget.marker = val;
    }
    if let Some(secs) = env_parsed("WIDGET", "TIMEOUT_SECONDS")? {
        config.widget.timeout_seconds = secs;
    }

    // Lookup overrides
    if let Some(secs) = env_parsed("LOOKUP", "BUDGET_SECONDS")? {
        config.lookup.budget_seconds = secs;
    }
    if let Some(val) = env_var("LOOKUP", "MERGE_MODE") {
        config.lookup.merge_mode = val.parse().map_err(LookupError::Configuration)?;
    }

    // Cache overrides
    if let Some(secs) = env_parsed("CACHE", "TTL_SECONDS")? {
        config.cache.ttl_seconds = secs;
    }
    if let Some(max) = env_parsed("CACHE", "MAX_ENTRIES")? {
        config.cache.max_entries = max;
    }

    // Logging overrides
    if let Some(enabled) = env_parsed("LOGGING", "LOCAL_ENABLED")? {
        config.logging.local_enabled = enabled;
    }
    if let Some(val) = env_var("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("VL_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${VL_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("VL_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("VL_LOADER_MISSING_VAR");
        let input = "password = \"${VL_LOADER_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("VL_LOADER_COMMENTED_VAR");
        let input = "# password = \"${VL_LOADER_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(LookupError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[server]
port = 9100

[portal]
base_url = "https://portal.example.com/"
username = "user"
password = "pass"
timeout_seconds = 5

[widget]
url_template = "https://widget.example.com/book?vrm={vrm}"

[cache]
ttl_seconds = 60
max_entries = 10
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.portal.base_url, "https://portal.example.com/");
        assert_eq!(config.portal.username.as_deref(), Some("user"));
        assert_eq!(config.cache.max_entries, 10);
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[cache]\nmax_entries = 0\n")
            .unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("cache.max_entries"));
    }
}
