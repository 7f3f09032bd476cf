//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the service configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after env overrides
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Application: {}", config.application.name);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Listen Address: {}", config.server.bind_address());
        println!("  CORS Enabled: {}", config.server.cors_enabled);
        println!("  Portal: {}", config.portal.base_url);
        println!(
            "  Portal Credentials: {}",
            if config.portal.username.is_some() && config.portal.password.is_some() {
                "configured"
            } else {
                "not configured (requests must supply them)"
            }
        );
        println!("  Widget: {}", config.widget.url_template);
        println!("  Widget Marker: {}", config.widget.marker);
        println!("  Lookup Budget: {}s", config.lookup.budget_seconds);
        println!("  Merge Mode: {}", config.lookup.merge_mode);
        println!(
            "  Cache: {} entries, {}s TTL",
            config.cache.max_entries, config.cache.ttl_seconds
        );
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let args = ValidateArgs {};
        let code = args.execute("/nonexistent/vehicle-lookup.toml").await.unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_minimal_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 9000").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }
}
