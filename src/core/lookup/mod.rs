//! Multi-source lookup
//!
//! - [`fanout`] - Concurrent source invocation with per-source isolation
//! - [`merge`] - Field cleaning and priority merge
//! - [`service`] - Cache-fronted request path

pub mod fanout;
pub mod merge;
pub mod service;

pub use fanout::{FanOut, FanOutResult};
pub use merge::{clean_records, merge, present};
pub use service::{LookupRequest, LookupService};
