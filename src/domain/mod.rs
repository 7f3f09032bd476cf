//! Domain models and types for the lookup service.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Canonical identifier** ([`Vrm`])
//! - **Per-source records** ([`SourceKind`], [`SourceRecord`])
//! - **Aggregate results** ([`AggregateResult`], [`VehicleData`], [`LookupSnapshot`])
//! - **Error types** ([`LookupError`], [`SourceError`])
//! - **Result type alias** ([`Result`])
//!
//! # Canonical identifiers
//!
//! Every spelling of a registration mark collapses to one canonical value:
//!
//! ```rust
//! use vehicle_lookup::domain::Vrm;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let a = Vrm::new(" ab 12 cde")?;
//! let b = Vrm::new("AB12CDE")?;
//! assert_eq!(a, b);
//! # Ok(())
//! # }
//! ```
//!
//! # Records
//!
//! A [`SourceRecord`] never holds an empty name or a blank value:
//!
//! ```rust
//! use vehicle_lookup::domain::SourceRecord;
//!
//! let mut record = SourceRecord::new();
//! record.insert("Make", "Ford");
//! record.insert("Colour", "  ");
//! assert_eq!(record.len(), 1);
//! ```

pub mod aggregate;
pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use aggregate::{AggregateResult, LookupSnapshot, MergeMode, VehicleData};
pub use errors::{LookupError, SourceError};
pub use ids::Vrm;
pub use record::{clean_field_name, SourceKind, SourceRecord};
pub use result::Result;
