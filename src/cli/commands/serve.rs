//! Serve command implementation
//!
//! Runs the HTTP service until SIGINT/SIGTERM.

use crate::config::load_config_or_default;
use crate::server::{self, AppState};
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the bind host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting serve command");

        let mut config = match load_config_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Configuration could not be loaded");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        if let Some(host) = &self.host {
            tracing::info!(host = %host, "Overriding bind host from CLI");
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            tracing::info!(port, "Overriding bind port from CLI");
            config.server.port = port;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let state = match AppState::from_config(&config) {
            Ok(state) => Arc::new(state),
            Err(e) => {
                tracing::error!(error = %e, "Failed to build lookup service");
                eprintln!("Failed to start: {e}");
                return Ok(5);
            }
        };

        tracing::info!(
            sources = ?state.service.sources(),
            merge_mode = %state.service.default_mode(),
            ttl_seconds = config.cache.ttl_seconds,
            max_entries = config.cache.max_entries,
            "Lookup service ready"
        );

        server::serve(&config.server, state, shutdown_signal).await?;
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_invalid_config_exits_with_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[cache]\nmax_entries = 0").unwrap();

        let (_tx, rx) = watch::channel(false);
        let args = ServeArgs {
            host: None,
            port: None,
        };
        let code = args
            .execute(file.path().to_str().unwrap(), rx)
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
