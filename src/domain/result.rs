//! Result type alias for the lookup service
//!
//! This module provides a convenient Result type alias that uses LookupError
//! as the error type.

use super::errors::LookupError;

/// Result type alias for lookup operations
///
/// # Examples
///
/// ```
/// use vehicle_lookup::domain::result::Result;
/// use vehicle_lookup::domain::errors::LookupError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(LookupError::InvalidIdentifier("AB-12".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, LookupError>;
