//! CLI command implementations
//!
//! Every command returns an exit code: 0 success, 2 configuration error,
//! 3 no data found, 5 fatal error.

pub mod init;
pub mod lookup;
pub mod serve;
pub mod validate;
