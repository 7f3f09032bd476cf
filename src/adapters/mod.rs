//! Upstream vehicle data sources.
//!
//! - [`portal`] - Credentialed WebForms portal (login, search, table rows)
//! - [`widget`] - Public booking widget with an embedded JSON object
//!
//! # Design Pattern
//!
//! Both sources implement [`VehicleSource`]. The orchestrator only sees the
//! trait, so tests substitute their own implementations and each upstream's
//! quirks stay inside its adapter.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vehicle_lookup::adapters::{PortalSource, VehicleSource, WidgetSource};
//! use vehicle_lookup::config::ServiceConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServiceConfig::default();
//! let sources: Vec<Arc<dyn VehicleSource>> = vec![
//!     Arc::new(PortalSource::new(config.portal.clone())),
//!     Arc::new(WidgetSource::new(config.widget.clone())?),
//! ];
//! # Ok(())
//! # }
//! ```

pub mod http;
pub mod portal;
pub mod source;
pub mod widget;

pub use portal::PortalSource;
pub use source::{Credentials, VehicleSource};
pub use widget::WidgetSource;
