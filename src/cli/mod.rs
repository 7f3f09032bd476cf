//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the lookup service using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Vehicle Lookup - unified vehicle data API
#[derive(Parser, Debug)]
#[command(name = "vehicle-lookup")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "vehicle-lookup.toml",
        env = "VEHICLE_LOOKUP_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VEHICLE_LOOKUP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service
    Serve(commands::serve::ServeArgs),

    /// Look up one vehicle and print the JSON result
    Lookup(commands::lookup::LookupArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::parse_from(["vehicle-lookup", "serve"]);
        assert_eq!(cli.config, "vehicle-lookup.toml");
        assert!(matches!(cli.command, Commands::Serve(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["vehicle-lookup", "--config", "custom.toml", "serve"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["vehicle-lookup", "--log-level", "debug", "serve"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_lookup() {
        let cli = Cli::parse_from(["vehicle-lookup", "lookup", "AB12CDE", "--merged"]);
        match cli.command {
            Commands::Lookup(args) => {
                assert_eq!(args.vrm, "AB12CDE");
                assert!(args.merged);
                assert!(!args.force_refresh);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["vehicle-lookup", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["vehicle-lookup", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
