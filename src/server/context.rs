//! Shared state handed to every request handler

use crate::config::ServiceConfig;
use crate::core::lookup::LookupService;
use crate::domain::Result;
use std::sync::Arc;
use url::Url;

/// Description shown by `GET /`
const DESCRIPTION: &str = "High-performance API combining multiple vehicle data sources";

/// Static service facts for the metadata route
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    /// Upstream hosts, in source priority order
    pub source_hosts: Vec<String>,
}

impl ServiceInfo {
    pub fn from_config(config: &ServiceConfig) -> Self {
        let source_hosts = [
            config.portal.base_url.as_str(),
            config.widget.url_template.as_str(),
        ]
        .into_iter()
        .filter_map(host_of)
        .collect();

        Self {
            name: config.application.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: DESCRIPTION.to_string(),
            source_hosts,
        }
    }
}

fn host_of(url: &str) -> Option<String> {
    let host = Url::parse(url).ok()?.host_str()?.to_string();
    Some(host.trim_start_matches("www.").to_string())
}

/// Service context: the lookup service (cache and adapters) plus metadata
///
/// Built once at startup, shared through an `Arc`, and drained on shutdown.
pub struct AppState {
    pub service: Arc<LookupService>,
    pub info: ServiceInfo,
}

impl AppState {
    pub fn new(service: Arc<LookupService>, info: ServiceInfo) -> Self {
        Self { service, info }
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let service = Arc::new(LookupService::from_config(config)?);
        Ok(Self::new(service, ServiceInfo::from_config(config)))
    }

    /// Release cached state once the listener has stopped
    pub fn drain(&self) {
        self.service.shutdown();
    }
}
