//! Domain error types
//!
//! This module defines the error hierarchy for the lookup service.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main lookup error type
///
/// This is the primary error type used throughout the application.
/// Only the variants that survive the adapter boundary live here; per-source
/// failures are described by [`SourceError`] and recovered locally.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Identifier failed the `^[A-Za-z0-9]{1,8}$` check
    #[error("Invalid VRM: {0}")]
    InvalidIdentifier(String),

    /// Every source came back empty for this identifier
    #[error("No data found for VRM: {vrm}")]
    NoDataFound { vrm: String },

    /// Source-level failure that escaped an adapter
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Unexpected fault anywhere in the pipeline
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LookupError {
    /// True when the error is the aggregate "all sources empty" outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NoDataFound { .. })
    }
}

/// Source-specific errors
///
/// Errors raised inside a source adapter. These never reach an HTTP caller:
/// the adapter logs them and contributes an empty record instead.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to reach the upstream host
    #[error("Failed to connect to source: {0}")]
    ConnectionFailed(String),

    /// Request exceeded the adapter's timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Upstream answered with a non-success status
    #[error("Unexpected status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Portal did not show the post-login welcome marker
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// Portal search did not reach a vehicle result page
    #[error("Search failed: {0}")]
    SearchFailed(String),

    /// A required form was missing from the page
    #[error("Form not found: {0}")]
    FormNotFound(String),

    /// The data container was absent from the result page
    #[error("Data container not found: {0}")]
    ContainerMissing(String),

    /// The embedded JSON marker was absent or its object unparsable
    #[error("Embedded object '{0}' not found")]
    MarkerNotFound(String),

    /// No credentials available for an authenticated source
    #[error("No credentials configured for {0}")]
    MissingCredentials(String),

    /// Response body could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.as_str().to_string())
            .unwrap_or_default();
        if err.is_timeout() {
            SourceError::Timeout(url)
        } else if let Some(status) = err.status() {
            SourceError::HttpStatus {
                status: status.as_u16(),
                url,
            }
        } else {
            // Strip the URL from the message; query strings may carry a VRM but never credentials
            SourceError::ConnectionFailed(err.without_url().to_string())
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for LookupError {
    fn from(err: std::io::Error) -> Self {
        LookupError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for LookupError {
    fn from(err: toml::de::Error) -> Self {
        LookupError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_display() {
        let err = LookupError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_no_data_found_echoes_vrm() {
        let err = LookupError::NoDataFound {
            vrm: "AB12CDE".to_string(),
        };
        assert_eq!(err.to_string(), "No data found for VRM: AB12CDE");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_source_error_conversion() {
        let source_err = SourceError::LoginFailed("welcome marker missing".to_string());
        let lookup_err: LookupError = source_err.into();
        assert!(matches!(lookup_err, LookupError::Source(_)));
        assert!(!lookup_err.is_not_found());
    }

    #[test]
    fn test_http_status_display() {
        let err = SourceError::HttpStatus {
            status: 503,
            url: "https://widget.example.com/book".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected status 503 from https://widget.example.com/book"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let lookup_err: LookupError = io_err.into();
        assert!(matches!(lookup_err, LookupError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let lookup_err: LookupError = json_err.into();
        assert!(matches!(lookup_err, LookupError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let lookup_err: LookupError = toml_err.into();
        assert!(matches!(lookup_err, LookupError::Configuration(_)));
        assert!(lookup_err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let err = LookupError::Internal("Test error".to_string());
        let _: &dyn std::error::Error = &err;
        let err = SourceError::Timeout("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
