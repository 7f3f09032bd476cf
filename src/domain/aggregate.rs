//! Cross-source result types

use super::ids::Vrm;
use super::record::{SourceKind, SourceRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How per-source records are presented to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Keep every source separate, keyed by source name
    #[default]
    Itemized,
    /// Fold all sources into one map using source priority
    Merged,
}

impl MergeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeMode::Itemized => "itemized",
            MergeMode::Merged => "merged",
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "itemized" | "itemised" | "all" => Ok(MergeMode::Itemized),
            "merged" | "merge" => Ok(MergeMode::Merged),
            other => Err(format!(
                "Invalid merge mode '{other}'. Must be one of: itemized, merged"
            )),
        }
    }
}

/// Vehicle data in either presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VehicleData {
    /// Source name → cleaned record
    Itemized(BTreeMap<SourceKind, SourceRecord>),
    /// Single priority-merged record
    Merged(SourceRecord),
}

impl VehicleData {
    /// Total number of fields across everything presented
    pub fn total_fields(&self) -> usize {
        match self {
            VehicleData::Itemized(sources) => sources.values().map(SourceRecord::len).sum(),
            VehicleData::Merged(record) => record.len(),
        }
    }
}

/// Snapshot of one acquisition, as held by the result cache
///
/// Records are already cleaned and non-empty; both presentations are
/// derived from the same snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupSnapshot {
    pub vrm: Vrm,
    pub records: BTreeMap<SourceKind, SourceRecord>,
    /// Sources that contributed at least one field, in priority order
    pub sources: Vec<SourceKind>,
    /// Wall-clock time of the fan-out
    pub elapsed: Duration,
    pub created_at: DateTime<Utc>,
}

impl LookupSnapshot {
    /// Acquisition latency in milliseconds, rounded to two decimals
    pub fn scrape_time_ms(&self) -> f64 {
        (self.elapsed.as_secs_f64() * 100_000.0).round() / 100.0
    }
}

/// Final response object for one VRM
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub vrm: Vrm,
    pub data: VehicleData,
    pub sources: Vec<SourceKind>,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_time: Option<String>,
    pub total_fields: usize,
    pub scrape_time_ms: f64,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_mode_parse() {
        assert_eq!("merged".parse::<MergeMode>().unwrap(), MergeMode::Merged);
        assert_eq!(" Itemized ".parse::<MergeMode>().unwrap(), MergeMode::Itemized);
        assert!("mixed".parse::<MergeMode>().is_err());
        assert_eq!(MergeMode::default(), MergeMode::Itemized);
    }

    #[test]
    fn test_total_fields_itemized_sums_sources() {
        let mut portal = SourceRecord::new();
        portal.insert("Make", "Ford");
        portal.insert("Model", "Focus");
        let mut widget = SourceRecord::new();
        widget.insert("Make", "FORD");

        let data = VehicleData::Itemized(BTreeMap::from([
            (SourceKind::Portal, portal),
            (SourceKind::Widget, widget),
        ]));
        assert_eq!(data.total_fields(), 3);
    }

    #[test]
    fn test_itemized_serializes_with_source_names() {
        let mut widget = SourceRecord::new();
        widget.insert("Colour", "Red");
        let data = VehicleData::Itemized(BTreeMap::from([(SourceKind::Widget, widget)]));
        assert_eq!(
            serde_json::to_string(&data).unwrap(),
            r#"{"widget":{"Colour":"Red"}}"#
        );
    }

    #[test]
    fn test_scrape_time_ms_rounding() {
        let snapshot = LookupSnapshot {
            vrm: Vrm::new("AB12").unwrap(),
            records: BTreeMap::new(),
            sources: vec![],
            elapsed: Duration::from_micros(1_234_567),
            created_at: Utc::now(),
        };
        assert_eq!(snapshot.scrape_time_ms(), 1234.57);
    }
}
