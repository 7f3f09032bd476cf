//! Core lookup engine.
//!
//! # Modules
//!
//! - [`extract`] - Embedded JSON extraction from HTML text
//! - [`lookup`] - Fan-out, merge and the cache-fronted lookup service
//! - [`cache`] - TTL and size bounded result cache
//!
//! # Lookup Workflow
//!
//! 1. **Canonicalize** the identifier
//! 2. **Cache**: return a fresh snapshot unless a refresh is forced
//! 3. **Fan out** to the portal and widget concurrently
//! 4. **Clean** field names and drop blank values
//! 5. **Store** the snapshot
//! 6. **Present** it itemized or merged
//!
//! # Example
//!
//! ```rust,no_run
//! use vehicle_lookup::config::load_config_or_default;
//! use vehicle_lookup::core::lookup::{LookupRequest, LookupService};
//! use vehicle_lookup::domain::MergeMode;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_default("vehicle-lookup.toml")?;
//! let service = LookupService::from_config(&config)?;
//!
//! let result = service
//!     .lookup(LookupRequest {
//!         mode: Some(MergeMode::Merged),
//!         ..LookupRequest::new("AB12CDE")
//!     })
//!     .await?;
//!
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod extract;
pub mod lookup;
