//! Route handlers

use super::context::AppState;
use super::error::ApiError;
use crate::adapters::Credentials;
use crate::core::cache::CacheStats;
use crate::core::lookup::LookupRequest;
use crate::domain::ids::is_valid_path_identifier;
use crate::domain::{AggregateResult, MergeMode};
use axum::extract::{Path, Query, State};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const FEATURES: [&str; 4] = [
    "async processing",
    "intelligent caching",
    "data deduplication",
    "itemized or merged output",
];

#[derive(Debug, Serialize)]
pub struct CacheInfo {
    pub current_size: usize,
    pub max_size: usize,
    pub ttl_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct ServiceMetadata {
    pub name: String,
    pub version: String,
    pub description: String,
    pub sources: Vec<String>,
    pub features: Vec<&'static str>,
    pub cache_info: CacheInfo,
}

/// Optional lookup parameters shared by `GET /{vrm}` and `POST /`
///
/// Not `Debug`: carries a plain-text password.
#[derive(Deserialize, Default)]
pub struct LookupParams {
    pub username: Option<String>,
    pub password: Option<String>,
    pub force_refresh: Option<String>,
    pub mode: Option<String>,
}

/// `POST /` body
#[derive(Deserialize, Default)]
pub struct LookupForm {
    pub vrm: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub force_refresh: Option<String>,
    pub mode: Option<String>,
}

impl LookupForm {
    fn split(self) -> (Option<String>, LookupParams) {
        let params = LookupParams {
            username: self.username,
            password: self.password,
            force_refresh: self.force_refresh,
            mode: self.mode,
        };
        (self.vrm, params)
    }
}

impl LookupParams {
    fn into_request(self, vrm: String) -> Result<LookupRequest, ApiError> {
        let force_refresh = match self.force_refresh.as_deref() {
            None => false,
            Some(raw) => parse_flag(raw).ok_or_else(|| {
                ApiError::unprocessable(format!("Invalid force_refresh value: {raw}"))
            })?,
        };
        let mode = match self.mode.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<MergeMode>().map_err(ApiError::unprocessable)?),
        };

        Ok(LookupRequest {
            vrm,
            credentials: Credentials::new(self.username, self.password),
            force_refresh,
            mode,
        })
    }
}

/// Accepts the usual spellings of a boolean query value
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// `GET /`
pub async fn metadata(State(state): State<Arc<AppState>>) -> Json<ServiceMetadata> {
    let cache = state.service.cache();
    Json(ServiceMetadata {
        name: state.info.name.clone(),
        version: state.info.version.clone(),
        description: state.info.description.clone(),
        sources: state.info.source_hosts.clone(),
        features: FEATURES.to_vec(),
        cache_info: CacheInfo {
            current_size: cache.len(),
            max_size: cache.max_entries(),
            ttl_seconds: cache.ttl().as_secs(),
        },
    })
}

/// `GET /cache/stats`
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    Json(state.service.cache_stats())
}

/// `DELETE /cache/clear`
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let cleared = state.service.cache().clear();
    tracing::info!(cleared, "Cache cleared on request");
    Json(serde_json::json!({ "message": "Cache cleared successfully" }))
}

/// `GET /{vrm}`
pub async fn lookup_path(
    State(state): State<Arc<AppState>>,
    Path(vrm): Path<String>,
    Query(params): Query<LookupParams>,
) -> Result<Json<AggregateResult>, ApiError> {
    if !is_valid_path_identifier(&vrm) {
        return Err(ApiError::unprocessable(format!(
            "VRM must match ^[A-Za-z0-9]{{1,8}}$: {vrm}"
        )));
    }
    let request = params.into_request(vrm)?;
    Ok(Json(state.service.lookup(request).await?))
}

/// `POST /`
pub async fn lookup_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LookupForm>,
) -> Result<Json<AggregateResult>, ApiError> {
    let (vrm, params) = form.split();
    let vrm = vrm
        .filter(|vrm| !vrm.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("VRM is required"))?;
    let request = params.into_request(vrm)?;
    Ok(Json(state.service.lookup(request).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("true", Some(true))]
    #[test_case("TRUE", Some(true))]
    #[test_case("1", Some(true))]
    #[test_case("false", Some(false))]
    #[test_case("", Some(false))]
    #[test_case("maybe", None)]
    fn test_parse_flag(raw: &str, expected: Option<bool>) {
        assert_eq!(parse_flag(raw), expected);
    }

    #[test]
    fn test_params_into_request() {
        let params = LookupParams {
            username: Some("alice".into()),
            password: Some("secret".into()),
            force_refresh: Some("true".into()),
            mode: Some("merged".into()),
        };
        let request = params.into_request("ab12".into()).unwrap();
        assert!(request.force_refresh);
        assert_eq!(request.mode, Some(MergeMode::Merged));
        assert_eq!(request.credentials.username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_params_reject_unknown_mode() {
        let params = LookupParams {
            mode: Some("sideways".into()),
            ..LookupParams::default()
        };
        let err = params.into_request("AB12".into()).err().unwrap();
        assert_eq!(err.status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }
}
