//! Vehicle source trait definition
//!
//! A source turns a [`Vrm`] into a [`SourceRecord`]. Failures stay inside
//! the source: [`VehicleSource::fetch`] logs them and yields an empty record,
//! so one broken upstream never takes a lookup down with it.

use crate::config::{secret_string_opt, PortalConfig, SecretString};
use crate::domain::{SourceError, SourceKind, SourceRecord, Vrm};
use async_trait::async_trait;
use std::time::Instant;

/// Portal login for one lookup
///
/// Request-supplied values win over configured defaults; empty strings
/// count as absent.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl Credentials {
    /// Credentials from request parameters
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self {
            username: username.filter(|u| !u.trim().is_empty()),
            password: secret_string_opt(password),
        }
    }

    /// Fill missing values from the portal configuration
    pub fn or_defaults(self, config: &PortalConfig) -> Self {
        let configured_password = config
            .password
            .clone()
            .filter(|p| !secrecy::ExposeSecret::expose_secret(p).is_empty());
        Self {
            username: self
                .username
                .or_else(|| config.username.clone().filter(|u| !u.trim().is_empty())),
            password: self.password.or(configured_password),
        }
    }

    /// Username and password when both are present
    pub fn pair(&self) -> Option<(&str, &SecretString)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username.as_str(), password)),
            _ => None,
        }
    }
}

/// Trait for upstream vehicle data sources
///
/// Implementors provide [`try_fetch`](VehicleSource::try_fetch); callers use
/// [`fetch`](VehicleSource::fetch), which never fails.
///
/// # Example
///
/// ```no_run
/// use vehicle_lookup::adapters::{Credentials, VehicleSource, WidgetSource};
/// use vehicle_lookup::config::WidgetConfig;
/// use vehicle_lookup::domain::Vrm;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let widget = WidgetSource::new(WidgetConfig::default())?;
/// let vrm = Vrm::new("AB12CDE")?;
/// let record = widget.fetch(&vrm, &Credentials::default()).await;
/// println!("{} fields", record.len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait VehicleSource: Send + Sync {
    /// Which source this is
    fn kind(&self) -> SourceKind;

    /// Fetch the record, reporting why it could not be produced
    async fn try_fetch(
        &self,
        vrm: &Vrm,
        credentials: &Credentials,
    ) -> Result<SourceRecord, SourceError>;

    /// Fetch the record, or an empty one on any failure
    async fn fetch(&self, vrm: &Vrm, credentials: &Credentials) -> SourceRecord {
        let started = Instant::now();
        match self.try_fetch(vrm, credentials).await {
            Ok(record) => {
                crate::log_source_result!(self.kind(), record.len(), started.elapsed());
                record
            }
            Err(e) => {
                tracing::warn!(
                    source = %self.kind(),
                    vrm = %vrm,
                    error = %e,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Source returned no data"
                );
                SourceRecord::new()
            }
        }
    }
}
