//! Concurrent fan-out to every source
//!
//! Each source runs as its own task under the lookup budget. A source that
//! errors, times out or panics contributes an empty record; the others are
//! unaffected. Results are only read after every task has finished.

use crate::adapters::{Credentials, VehicleSource};
use crate::domain::{LookupError, Result, SourceKind, SourceRecord, Vrm};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Per-source records from one fan-out
#[derive(Debug, Clone, PartialEq)]
pub struct FanOutResult {
    /// Every configured source, including those that came back empty
    pub records: BTreeMap<SourceKind, SourceRecord>,
    /// Sources with at least one field, in priority order
    pub sources: Vec<SourceKind>,
    /// Wall-clock time from launch to the last join
    pub elapsed: Duration,
}

/// Runs all sources for one identifier and joins on them
pub struct FanOut {
    sources: Vec<Arc<dyn VehicleSource>>,
    budget: Duration,
}

impl FanOut {
    pub fn new(sources: Vec<Arc<dyn VehicleSource>>, budget: Duration) -> Self {
        Self { sources, budget }
    }

    pub fn source_kinds(&self) -> Vec<SourceKind> {
        self.sources.iter().map(|s| s.kind()).collect()
    }

    /// Query every source concurrently
    ///
    /// # Errors
    ///
    /// [`LookupError::NoDataFound`] when no source produced a field.
    pub async fn run(&self, vrm: &Vrm, credentials: &Credentials) -> Result<FanOutResult> {
        let started = Instant::now();

        let handles: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let kind = source.kind();
                let source = Arc::clone(source);
                let vrm = vrm.clone();
                let credentials = credentials.clone();
                let budget = self.budget;
                let handle = tokio::spawn(async move {
                    tokio::time::timeout(budget, source.fetch(&vrm, &credentials)).await
                });
                (kind, handle)
            })
            .collect();

        let mut records = BTreeMap::new();
        for (kind, handle) in handles {
            let record = match handle.await {
                Ok(Ok(record)) => record,
                Ok(Err(_)) => {
                    tracing::warn!(
                        source = %kind,
                        budget_ms = self.budget.as_millis() as u64,
                        "Source exceeded lookup budget"
                    );
                    SourceRecord::new()
                }
                Err(e) => {
                    tracing::error!(source = %kind, error = %e, "Source task failed");
                    SourceRecord::new()
                }
            };
            records.insert(kind, record);
        }
        let elapsed = started.elapsed();

        let sources: Vec<SourceKind> = SourceKind::PRIORITY
            .into_iter()
            .filter(|kind| records.get(kind).is_some_and(|r| !r.is_empty()))
            .collect();

        if sources.is_empty() {
            return Err(LookupError::NoDataFound {
                vrm: vrm.to_string(),
            });
        }

        Ok(FanOutResult {
            records,
            sources,
            elapsed,
        })
    }
}
