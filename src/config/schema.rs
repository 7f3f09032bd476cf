//! Configuration schema types
//!
//! This module defines the configuration structure for the lookup service.
//! Every section has defaults, so an empty TOML document is a valid config.

use crate::config::SecretString;
use crate::domain::MergeMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main service configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Credentialed portal source
    #[serde(default)]
    pub portal: PortalConfig,

    /// Public booking widget source
    #[serde(default)]
    pub widget: WidgetConfig,

    /// Fan-out and presentation settings
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Result cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.server.validate()?;
        self.portal.validate()?;
        self.widget.validate()?;
        self.lookup.validate()?;
        self.cache.validate()?;
        self.logging.validate()?;

        // A slow source must never hold the other past the fan-out budget
        let budget = self.lookup.budget_seconds;
        if self.portal.timeout_seconds >= budget {
            return Err(format!(
                "portal.timeout_seconds ({}) must be less than lookup.budget_seconds ({budget})",
                self.portal.timeout_seconds
            ));
        }
        if self.widget.timeout_seconds >= budget {
            return Err(format!(
                "widget.timeout_seconds ({}) must be less than lookup.budget_seconds ({budget})",
                self.widget.timeout_seconds
            ));
        }
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Service name reported by `GET /`
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Attach a permissive CORS layer
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Seconds in-flight requests get to finish after a shutdown signal
    #[serde(default = "default_shutdown_grace_seconds")]
    pub shutdown_grace_seconds: u64,
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("server.host cannot be empty".to_string());
        }
        if self.port == 0 {
            return Err("server.port must be > 0".to_string());
        }
        Ok(())
    }

    /// `host:port` string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            shutdown_grace_seconds: default_shutdown_grace_seconds(),
        }
    }
}

/// Portal source configuration
///
/// The portal is an ASP.NET WebForms site: login and search are both form
/// posts, and the vehicle data lives in a table inside a named container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Portal landing page holding the login form
    #[serde(default = "default_portal_base_url")]
    pub base_url: String,

    /// Default username when a request supplies none
    #[serde(default)]
    pub username: Option<String>,

    /// Default password when a request supplies none
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Per-request timeout in seconds
    #[serde(default = "default_portal_timeout_seconds")]
    pub timeout_seconds: u64,

    /// User-Agent header sent to the portal
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Form field names and page markers
    #[serde(default)]
    pub form: PortalFormConfig,
}

impl PortalConfig {
    fn validate(&self) -> Result<(), String> {
        validate_http_url("portal.base_url", &self.base_url)?;
        if self.timeout_seconds == 0 {
            return Err("portal.timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_portal_base_url(),
            username: None,
            password: None,
            timeout_seconds: default_portal_timeout_seconds(),
            user_agent: default_user_agent(),
            form: PortalFormConfig::default(),
        }
    }
}

/// Names of the portal's form fields and the text that marks each page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalFormConfig {
    /// `action` attribute of the preferred login form
    pub login_action: String,
    pub username_field: String,
    pub password_field: String,
    /// Text present only after a successful login
    pub welcome_marker: String,
    /// CSS selector of the search form
    pub search_form_selector: String,
    pub search_field: String,
    /// Postback target that triggers the vehicle search
    pub search_event_target: String,
    /// Text present only on a vehicle result page
    pub result_marker: String,
    /// Element id of the container holding the result rows
    pub data_container_id: String,
}

impl Default for PortalFormConfig {
    fn default() -> Self {
        Self {
            login_action: "./Login.aspx".to_string(),
            username_field: "ctl00$MainContentPlaceHolder$Username".to_string(),
            password_field: "ctl00$MainContentPlaceHolder$Password".to_string(),
            welcome_marker: "Welcome to e3 technical".to_string(),
            search_form_selector: "form#aspnetForm".to_string(),
            search_field: "ctl00$SearchContentPlaceHolder$Search$SearchKey".to_string(),
            search_event_target: "ctl00$SearchContentPlaceHolder$Search$SearchVehicle"
                .to_string(),
            result_marker: "Vehicle Registration Mark (Current)".to_string(),
            data_container_id: "ctl00_MainContentPlaceHolder_VehicleDataContainer".to_string(),
        }
    }
}

/// Widget source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Page URL; `{vrm}` is replaced with the canonical identifier
    #[serde(default = "default_widget_url_template")]
    pub url_template: String,

    /// JSON key whose object value holds the vehicle fields
    #[serde(default = "default_widget_marker")]
    pub marker: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_widget_timeout_seconds")]
    pub timeout_seconds: u64,

    /// User-Agent header sent to the widget
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl WidgetConfig {
    fn validate(&self) -> Result<(), String> {
        validate_http_url("widget.url_template", &self.url_template)?;
        if !self.url_template.contains("{vrm}") {
            return Err("widget.url_template must contain a {vrm} placeholder".to_string());
        }
        if self.marker.trim().is_empty() {
            return Err("widget.marker cannot be empty".to_string());
        }
        if self.timeout_seconds == 0 {
            return Err("widget.timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            url_template: default_widget_url_template(),
            marker: default_widget_marker(),
            timeout_seconds: default_widget_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

/// Fan-out configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Upper bound on one fan-out, in seconds
    #[serde(default = "default_budget_seconds")]
    pub budget_seconds: u64,

    /// Presentation used when a request does not choose one
    #[serde(default)]
    pub merge_mode: MergeMode,
}

impl LookupConfig {
    fn validate(&self) -> Result<(), String> {
        if self.budget_seconds == 0 {
            return Err("lookup.budget_seconds must be > 0".to_string());
        }
        Ok(())
    }

    pub fn budget(&self) -> Duration {
        Duration::from_secs(self.budget_seconds)
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            budget_seconds: default_budget_seconds(),
            merge_mode: MergeMode::default(),
        }
    }
}

/// Result cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry lifetime from creation
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Maximum number of cached identifiers
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl CacheConfig {
    fn validate(&self) -> Result<(), String> {
        if self.ttl_seconds == 0 {
            return Err("cache.ttl_seconds must be > 0".to_string());
        }
        if self.max_entries == 0 {
            return Err("cache.max_entries must be > 0".to_string());
        }
        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            max_entries: default_max_entries(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{field} cannot be empty"));
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(format!("{field} must start with http:// or https://"));
    }
    Ok(())
}

// Default value functions
fn default_app_name() -> String {
    "Unified Vehicle Data API".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_shutdown_grace_seconds() -> u64 {
    10
}

fn default_portal_base_url() -> String {
    "https://e3technical.haynespro.com/".to_string()
}

fn default_portal_timeout_seconds() -> u64 {
    8
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_widget_url_template() -> String {
    "https://bookmygarage.com/garage-detail/sussexautocareltd/rh12lw/book/?ref=sussexautocare.co.uk&vrm={vrm}&referrer=widget".to_string()
}

fn default_widget_marker() -> String {
    "VrmDetails".to_string()
}

fn default_widget_timeout_seconds() -> u64 {
    10
}

fn default_budget_seconds() -> u64 {
    15
}

fn default_ttl_seconds() -> u64 {
    3600
}

fn default_max_entries() -> usize {
    5000
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
