//! Logging and observability
//!
//! Structured logging through `tracing`, with:
//! - Human-readable console output
//! - Optional JSON file logging with rotation
//! - Helper macros for the events every lookup emits
//!
//! # Example
//!
//! ```no_run
//! use vehicle_lookup::logging::init_logging;
//! use vehicle_lookup::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Service started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a lookup
///
/// # Example
///
/// ```no_run
/// use vehicle_lookup::log_lookup_start;
/// use vehicle_lookup::domain::{MergeMode, Vrm};
///
/// let vrm = Vrm::new("AB12CDE").unwrap();
/// log_lookup_start!(&vrm, MergeMode::Itemized, false);
/// ```
#[macro_export]
macro_rules! log_lookup_start {
    ($vrm:expr, $mode:expr, $force_refresh:expr) => {
        tracing::info!(
            vrm = %$vrm,
            mode = %$mode,
            force_refresh = $force_refresh,
            "Starting lookup"
        );
    };
}

/// Log what one source contributed
///
/// # Example
///
/// ```no_run
/// use vehicle_lookup::log_source_result;
/// use vehicle_lookup::domain::SourceKind;
/// use std::time::Duration;
///
/// log_source_result!(SourceKind::Widget, 12, Duration::from_millis(640));
/// ```
#[macro_export]
macro_rules! log_source_result {
    ($source:expr, $fields:expr, $duration:expr) => {
        tracing::debug!(
            source = %$source,
            fields = $fields,
            duration_ms = $duration.as_millis() as u64,
            "Source finished"
        );
    };
}

/// Log the completion of a lookup
///
/// # Example
///
/// ```no_run
/// use vehicle_lookup::log_lookup_complete;
///
/// log_lookup_complete!(27, false, 812.4);
/// ```
#[macro_export]
macro_rules! log_lookup_complete {
    ($total_fields:expr, $cached:expr, $scrape_time_ms:expr) => {
        tracing::info!(
            total_fields = $total_fields,
            cached = $cached,
            scrape_time_ms = $scrape_time_ms,
            "Lookup completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use vehicle_lookup::log_error_with_context;
/// use vehicle_lookup::domain::LookupError;
///
/// let error = LookupError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::{LookupError, MergeMode, SourceKind, Vrm};
    use std::time::Duration;

    #[test]
    fn test_macros_expand_without_subscriber() {
        let vrm = Vrm::new("AB12CDE").unwrap();
        log_lookup_start!(&vrm, MergeMode::Merged, true);
        log_source_result!(SourceKind::Portal, 3usize, Duration::from_millis(5));
        log_lookup_complete!(3usize, false, 5.0);
        log_error_with_context!(&LookupError::Internal("x".into()), "test");
    }
}
