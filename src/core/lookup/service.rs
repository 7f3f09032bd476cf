//! Request path for one vehicle lookup
//!
//! canonicalize → cache → fan-out → clean → store → present

use super::fanout::FanOut;
use super::merge::{clean_records, present};
use crate::adapters::{Credentials, PortalSource, VehicleSource, WidgetSource};
use crate::config::ServiceConfig;
use crate::core::cache::{CacheStats, ResultCache};
use crate::domain::{
    AggregateResult, LookupError, LookupSnapshot, MergeMode, Result, SourceKind, Vrm,
};
use chrono::{Local, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

/// Format of `cache_time` in responses
const CACHE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One lookup as asked for by a caller
#[derive(Debug, Clone, Default)]
pub struct LookupRequest {
    /// Identifier as typed; canonicalized by the service
    pub vrm: String,
    pub credentials: Credentials,
    pub force_refresh: bool,
    /// Presentation; the configured default when absent
    pub mode: Option<MergeMode>,
}

impl LookupRequest {
    pub fn new(vrm: impl Into<String>) -> Self {
        Self {
            vrm: vrm.into(),
            ..Self::default()
        }
    }
}

/// Cache-fronted lookup over all configured sources
///
/// Constructed once at startup and shared by every request task.
///
/// # Example
///
/// ```no_run
/// use vehicle_lookup::config::ServiceConfig;
/// use vehicle_lookup::core::lookup::{LookupRequest, LookupService};
///
/// # async fn example() -> vehicle_lookup::domain::Result<()> {
/// let service = LookupService::from_config(&ServiceConfig::default())?;
/// let result = service.lookup(LookupRequest::new("ab12 cde")).await?;
/// println!("{} fields from {:?}", result.total_fields, result.sources);
/// # Ok(())
/// # }
/// ```
pub struct LookupService {
    fan_out: FanOut,
    cache: Arc<ResultCache>,
    default_mode: MergeMode,
}

impl LookupService {
    pub fn new(
        sources: Vec<Arc<dyn VehicleSource>>,
        cache: Arc<ResultCache>,
        budget: Duration,
        default_mode: MergeMode,
    ) -> Self {
        Self {
            fan_out: FanOut::new(sources, budget),
            cache,
            default_mode,
        }
    }

    /// Build the portal and widget adapters and a cache from configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let sources: Vec<Arc<dyn VehicleSource>> = vec![
            Arc::new(PortalSource::new(config.portal.clone())),
            Arc::new(WidgetSource::new(config.widget.clone())?),
        ];
        let cache = Arc::new(ResultCache::new(
            config.cache.ttl(),
            config.cache.max_entries,
        ));
        Ok(Self::new(
            sources,
            cache,
            config.lookup.budget(),
            config.lookup.merge_mode,
        ))
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn sources(&self) -> Vec<SourceKind> {
        self.fan_out.source_kinds()
    }

    pub fn default_mode(&self) -> MergeMode {
        self.default_mode
    }

    /// Look up one vehicle
    ///
    /// # Errors
    ///
    /// - [`LookupError::InvalidIdentifier`] for a malformed VRM
    /// - [`LookupError::NoDataFound`] when every source came back empty
    pub async fn lookup(&self, request: LookupRequest) -> Result<AggregateResult> {
        let vrm = Vrm::new(&request.vrm).map_err(LookupError::InvalidIdentifier)?;
        let mode = request.mode.unwrap_or(self.default_mode);
        let span = tracing::info_span!("lookup", lookup_id = %Uuid::new_v4(), vrm = %vrm);

        self.lookup_canonical(vrm, mode, request)
            .instrument(span)
            .await
    }

    async fn lookup_canonical(
        &self,
        vrm: Vrm,
        mode: MergeMode,
        request: LookupRequest,
    ) -> Result<AggregateResult> {
        crate::log_lookup_start!(&vrm, mode, request.force_refresh);

        if request.force_refresh {
            self.cache.invalidate(&vrm);
        } else if let Some(snapshot) = self.cache.get(&vrm) {
            let result = respond(&snapshot, mode, true);
            crate::log_lookup_complete!(result.total_fields, true, result.scrape_time_ms);
            return Ok(result);
        }

        let fanned = self.fan_out.run(&vrm, &request.credentials).await?;
        let records = clean_records(fanned.records);
        let sources: Vec<SourceKind> = fanned
            .sources
            .into_iter()
            .filter(|kind| records.contains_key(kind))
            .collect();
        if sources.is_empty() {
            return Err(LookupError::NoDataFound {
                vrm: vrm.to_string(),
            });
        }

        let snapshot = self.cache.put(LookupSnapshot {
            vrm,
            records,
            sources,
            elapsed: fanned.elapsed,
            created_at: Utc::now(),
        });

        let result = respond(&snapshot, mode, false);
        crate::log_lookup_complete!(result.total_fields, false, result.scrape_time_ms);
        Ok(result)
    }

    /// Drop all cached results, logging final statistics
    pub fn shutdown(&self) {
        let stats = self.cache.stats();
        let dropped = self.cache.clear();
        tracing::info!(
            dropped,
            hits = stats.hit_info.hits,
            misses = stats.hit_info.misses,
            evictions = stats.hit_info.evictions,
            "Lookup service drained"
        );
    }
}

fn respond(snapshot: &LookupSnapshot, mode: MergeMode, cached: bool) -> AggregateResult {
    let data = present(snapshot, mode);
    AggregateResult {
        vrm: snapshot.vrm.clone(),
        total_fields: data.total_fields(),
        data,
        sources: snapshot.sources.clone(),
        cached,
        cache_time: cached.then(|| {
            snapshot
                .created_at
                .with_timezone(&Local)
                .format(CACHE_TIME_FORMAT)
                .to_string()
        }),
        scrape_time_ms: snapshot.scrape_time_ms(),
        created_at: snapshot.created_at,
    }
}
