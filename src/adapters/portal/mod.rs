//! Credentialed portal source
//!
//! Logs in to the portal, searches for the vehicle and reads the key/value
//! rows of the result table. Every lookup uses a fresh cookie jar, so no
//! session state is shared between requests.

pub mod form;
pub mod rows;
pub mod session;

pub use rows::extract_rows;
pub use session::login_and_search;

use super::http::build_client;
use super::source::{Credentials, VehicleSource};
use crate::config::PortalConfig;
use crate::domain::{SourceError, SourceKind, SourceRecord, Vrm};
use async_trait::async_trait;

/// Portal adapter
pub struct PortalSource {
    config: PortalConfig,
}

impl PortalSource {
    pub fn new(config: PortalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }
}

#[async_trait]
impl VehicleSource for PortalSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Portal
    }

    async fn try_fetch(
        &self,
        vrm: &Vrm,
        credentials: &Credentials,
    ) -> Result<SourceRecord, SourceError> {
        let credentials = credentials.clone().or_defaults(&self.config);
        let (username, password) = credentials
            .pair()
            .ok_or_else(|| SourceError::MissingCredentials(SourceKind::Portal.to_string()))?;

        let client = build_client(&self.config.user_agent, self.config.timeout(), true)?;
        let document = login_and_search(&client, &self.config, vrm, username, password).await?;
        extract_rows(&document, &self.config.form.data_container_id)
    }
}
