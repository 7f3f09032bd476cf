//! Lookup command implementation
//!
//! One-shot lookup against the live sources, printing the same JSON body
//! `GET /{vrm}` returns.

use crate::adapters::Credentials;
use crate::config::load_config_or_default;
use crate::core::lookup::{LookupRequest, LookupService};
use crate::domain::{LookupError, MergeMode};
use clap::Args;
use std::fmt;

/// Arguments for the lookup command
#[derive(Args)]
pub struct LookupArgs {
    /// Vehicle registration mark
    pub vrm: String,

    /// Merge all sources into one map instead of itemizing per source
    #[arg(long, conflicts_with = "mode")]
    pub merged: bool,

    /// Output mode (itemized or merged)
    #[arg(long)]
    pub mode: Option<String>,

    /// Portal username (defaults to the configured one)
    #[arg(long, env = "VEHICLE_LOOKUP_USERNAME")]
    pub username: Option<String>,

    /// Portal password (defaults to the configured one)
    #[arg(long, env = "VEHICLE_LOOKUP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Accepted for parity with the HTTP surface; a one-shot run has no warm cache
    #[arg(long)]
    pub force_refresh: bool,
}

impl fmt::Debug for LookupArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupArgs")
            .field("vrm", &self.vrm)
            .field("merged", &self.merged)
            .field("mode", &self.mode)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("force_refresh", &self.force_refresh)
            .finish()
    }
}

impl LookupArgs {
    fn merge_mode(&self) -> Result<Option<MergeMode>, String> {
        if self.merged {
            return Ok(Some(MergeMode::Merged));
        }
        self.mode.as_deref().map(str::parse).transpose()
    }

    /// Execute the lookup command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(vrm = %self.vrm, "Starting lookup command");

        let mode = match self.merge_mode() {
            Ok(mode) => mode,
            Err(e) => {
                eprintln!("{e}");
                return Ok(2);
            }
        };

        let config = match load_config_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let service = match LookupService::from_config(&config) {
            Ok(service) => service,
            Err(e) => {
                eprintln!("Failed to build lookup service: {e}");
                return Ok(5);
            }
        };

        let request = LookupRequest {
            vrm: self.vrm.clone(),
            credentials: Credentials::new(self.username.clone(), self.password.clone()),
            force_refresh: self.force_refresh,
            mode,
        };

        match service.lookup(request).await {
            Ok(result) => {
                println!("{}", serde_json::to_string_pretty(&result)?);
                Ok(0)
            }
            Err(e @ LookupError::InvalidIdentifier(_)) => {
                eprintln!("{e}");
                Ok(2)
            }
            Err(e @ LookupError::NoDataFound { .. }) => {
                eprintln!("{e}");
                Ok(3)
            }
            Err(e) => {
                tracing::error!(error = %e, "Lookup failed");
                eprintln!("Lookup failed: {e}");
                Ok(5)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(merged: bool, mode: Option<&str>) -> LookupArgs {
        LookupArgs {
            vrm: "AB12CDE".to_string(),
            merged,
            mode: mode.map(str::to_string),
            username: Some("alice".to_string()),
            password: Some("hunter2".to_string()),
            force_refresh: false,
        }
    }

    #[test]
    fn test_merge_mode_selection() {
        assert_eq!(args(false, None).merge_mode(), Ok(None));
        assert_eq!(args(true, None).merge_mode(), Ok(Some(MergeMode::Merged)));
        assert_eq!(
            args(false, Some("itemized")).merge_mode(),
            Ok(Some(MergeMode::Itemized))
        );
        assert!(args(false, Some("sideways")).merge_mode().is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", args(false, None));
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_invalid_vrm_exits_with_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let mut args = args(false, None);
        args.vrm = "AB-12".to_string();

        let code = args.execute(missing.to_str().unwrap()).await.unwrap();
        assert_eq!(code, 2);
    }
}
