// Vehicle Lookup - Unified vehicle data API
// Copyright (c) 2025 Vehicle Lookup Contributors
// Licensed under the MIT License

//! # Vehicle Lookup - Unified vehicle data API
//!
//! An HTTP service that answers "what do we know about this vehicle?" for a
//! UK registration mark by querying two independent upstream sources at once
//! and combining their answers.
//!
//! ## Overview
//!
//! This library provides:
//! - **Portal lookup** through a credentialed ASP.NET WebForms session
//! - **Widget lookup** by extracting an embedded JSON blob from a booking page
//! - **Fan-out** with per-source timeouts and failure isolation
//! - **Presentation** as per-source itemized records or one priority-merged map
//! - **Caching** of results for an hour, bounded by entry count
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`server`] - HTTP routes, error mapping and service context
//! - [`core`] - Lookup engine (extraction, fan-out, merge, cache)
//! - [`adapters`] - Upstream sources
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vehicle_lookup::config::load_config_or_default;
//! use vehicle_lookup::core::lookup::{LookupRequest, LookupService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("vehicle-lookup.toml")?;
//!     let service = LookupService::from_config(&config)?;
//!
//!     let result = service.lookup(LookupRequest::new("AB12 CDE")).await?;
//!     println!("{} fields from {:?}", result.total_fields, result.sources);
//!     Ok(())
//! }
//! ```
//!
//! ## Embedded JSON
//!
//! The widget page carries its data as a JSON object literal somewhere in a
//! script, sometimes string-escaped. [`core::extract`] finds and decodes it:
//!
//! ```rust
//! use vehicle_lookup::core::extract::extract_embedded_json;
//!
//! let html = r#"<script>window.state = {"VrmDetails":{"Make":"FORD","Note":"{x}"}};</script>"#;
//! let details = extract_embedded_json(html, "VrmDetails").unwrap();
//! assert_eq!(details["Make"], "FORD");
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`]. A failing source never
//! fails a lookup: it contributes an empty record and the failure is logged.
//! Only "no source had anything" ([`domain::LookupError::NoDataFound`]) and
//! unexpected faults reach the caller.
//!
//! ## Logging
//!
//! Structured logging with the `tracing` crate; see [`logging`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod server;
