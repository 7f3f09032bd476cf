//! Public booking widget source
//!
//! The widget page is plain HTML with the vehicle details embedded as a
//! JSON object under a marker key. One GET per lookup, no session.

use super::http::{build_client, ensure_success};
use super::source::{Credentials, VehicleSource};
use crate::config::WidgetConfig;
use crate::core::extract::{extract_embedded_json, JsonObject};
use crate::domain::{SourceError, SourceKind, SourceRecord, Vrm};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Widget adapter
pub struct WidgetSource {
    config: WidgetConfig,
    client: Client,
}

impl WidgetSource {
    /// Create the adapter with its own connection pool
    pub fn new(config: WidgetConfig) -> Result<Self, SourceError> {
        let client = build_client(&config.user_agent, config.timeout(), false)?;
        Ok(Self { config, client })
    }

    /// Page URL for one identifier
    pub fn url_for(&self, vrm: &Vrm) -> String {
        self.config.url_template.replace("{vrm}", vrm.as_str())
    }
}

#[async_trait]
impl VehicleSource for WidgetSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Widget
    }

    async fn try_fetch(&self, vrm: &Vrm, _: &Credentials) -> Result<SourceRecord, SourceError> {
        let response = ensure_success(self.client.get(self.url_for(vrm)).send().await?)?;
        let body = response.text().await?;

        let object = extract_embedded_json(&body, &self.config.marker)
            .ok_or_else(|| SourceError::MarkerNotFound(self.config.marker.clone()))?;
        Ok(flatten(object))
    }
}

/// Turn the embedded object into string fields
///
/// Scalars become their text form, `null` is dropped and nested values are
/// kept as compact JSON.
pub fn flatten(object: JsonObject) -> SourceRecord {
    object
        .into_iter()
        .filter_map(|(name, value)| flatten_value(value).map(|text| (name, text)))
        .collect()
}

fn flatten_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested @ (Value::Array(_) | Value::Object(_)) => Some(nested.to_string()),
    }
}
