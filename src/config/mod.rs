//! Configuration management for the lookup service.
//!
//! # Overview
//!
//! The service reads a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for every setting
//! - `VEHICLE_LOOKUP_<SECTION>_<KEY>` environment overrides
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Service name and log level
//! - [`ServerConfig`] - HTTP listener
//! - [`PortalConfig`] - Credentialed portal source and its form layout
//! - [`WidgetConfig`] - Public booking widget source
//! - [`LookupConfig`] - Fan-out budget and default merge mode
//! - [`CacheConfig`] - TTL and capacity of the result cache
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! port = 8000
//!
//! [portal]
//! username = "${PORTAL_USERNAME}"
//! password = "${PORTAL_PASSWORD}"
//! timeout_seconds = 8
//!
//! [widget]
//! timeout_seconds = 10
//!
//! [lookup]
//! budget_seconds = 15
//! merge_mode = "itemized"
//!
//! [cache]
//! ttl_seconds = 3600
//! max_entries = 5000
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, CacheConfig, LoggingConfig, LookupConfig, PortalConfig, PortalFormConfig,
    ServerConfig, ServiceConfig, WidgetConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
