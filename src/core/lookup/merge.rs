//! Field normalization and cross-source merging

use crate::domain::{LookupSnapshot, MergeMode, SourceKind, SourceRecord, VehicleData};
use std::collections::BTreeMap;

/// Clean every record's field names and drop sources left with nothing
pub fn clean_records(
    records: BTreeMap<SourceKind, SourceRecord>,
) -> BTreeMap<SourceKind, SourceRecord> {
    records
        .into_iter()
        .map(|(kind, record)| (kind, record.cleaned()))
        .filter(|(_, record)| !record.is_empty())
        .collect()
}

/// Fold records into one, taking each field from the highest-priority
/// source that has it
///
/// Records are cleaned first, so `"Combined VIN"` from one source and
/// `"VIN"` from another compete for the same key.
pub fn merge(records: &BTreeMap<SourceKind, SourceRecord>) -> SourceRecord {
    let mut merged = SourceRecord::new();
    for kind in SourceKind::PRIORITY {
        let Some(record) = records.get(&kind) else {
            continue;
        };
        for (name, value) in record.cleaned().iter() {
            if merged.get(name).is_none() {
                merged.insert(name, value);
            }
        }
    }
    merged
}

/// Present a snapshot in the requested mode
pub fn present(snapshot: &LookupSnapshot, mode: MergeMode) -> VehicleData {
    match mode {
        MergeMode::Itemized => VehicleData::Itemized(snapshot.records.clone()),
        MergeMode::Merged => VehicleData::Merged(merge(&snapshot.records)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[(&str, &str)]) -> SourceRecord {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_portal_wins_and_widget_fills_gaps() {
        let records = BTreeMap::from([
            (SourceKind::Portal, record(&[("Make", "Ford")])),
            (SourceKind::Widget, record(&[("Make", ""), ("Colour", "Red")])),
        ]);

        let merged = merge(&records);
        assert_eq!(merged, record(&[("Make", "Ford"), ("Colour", "Red")]));
    }

    #[test]
    fn test_lower_priority_used_only_when_higher_lacks_field() {
        let records = BTreeMap::from([
            (SourceKind::Portal, record(&[("Make", "FORD")])),
            (
                SourceKind::Widget,
                record(&[("Make", "Ford"), ("Model", "Focus")]),
            ),
        ]);

        let merged = merge(&records);
        assert_eq!(merged.get("Make"), Some("FORD"));
        assert_eq!(merged.get("Model"), Some("Focus"));
    }

    #[test]
    fn test_merge_compares_cleaned_names() {
        let records = BTreeMap::from([
            (SourceKind::Portal, record(&[("Combined Engine Size", "1596")])),
            (SourceKind::Widget, record(&[("Engine Size", "1.6")])),
        ]);

        let merged = merge(&records);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get("Engine Size"), Some("1596"));
    }

    #[test]
    fn test_merge_of_nothing() {
        assert!(merge(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_clean_records_drops_emptied_sources() {
        let records = BTreeMap::from([
            (SourceKind::Portal, record(&[("Combined", "x")])),
            (SourceKind::Widget, record(&[("CombinedVIN", "WF0")])),
        ]);

        let cleaned = clean_records(records);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[&SourceKind::Widget].get("VIN"), Some("WF0"));
    }
}
