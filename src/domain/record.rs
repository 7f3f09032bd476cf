//! Per-source field records
//!
//! A [`SourceRecord`] is one source's field → value extraction for one VRM.
//! Entries with an empty name or a blank value are never stored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Label prefixes one upstream applies inconsistently, longest first
const COMBINED_PREFIXES: [&str; 2] = ["Combined ", "Combined"];

/// The fixed set of upstream sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Credentialed, form-driven portal
    Portal,
    /// Public booking widget with an embedded JSON blob
    Widget,
}

impl SourceKind {
    /// Every source, in merge priority order (highest first)
    pub const PRIORITY: [SourceKind; 2] = [SourceKind::Portal, SourceKind::Widget];

    /// Stable name used in responses and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Portal => "portal",
            SourceKind::Widget => "widget",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name → value mapping produced by exactly one source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRecord {
    fields: BTreeMap<String, String>,
}

impl SourceRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, returning `false` when it was dropped
    ///
    /// Empty names and empty or whitespace-only values are rejected.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        let value = value.into();
        if name.is_empty() || value.trim().is_empty() {
            return false;
        }
        self.fields.insert(name, value);
        true
    }

    /// Look up a field value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the source contributed nothing
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Field names in name order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Copy of this record with every field name cleaned
    ///
    /// When a stripped name collides with a name that was already clean
    /// (`"Combined VIN"` vs `"VIN"`), the already-clean entry wins.
    pub fn cleaned(&self) -> SourceRecord {
        let mut out = SourceRecord::new();
        let (prefixed, plain): (Vec<_>, Vec<_>) = self
            .fields
            .iter()
            .partition(|(name, _)| clean_field_name(name) != name.as_str());

        for (name, value) in prefixed.into_iter().chain(plain) {
            out.insert(clean_field_name(name), value.as_str());
        }
        out
    }
}

impl FromIterator<(String, String)> for SourceRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut record = SourceRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl IntoIterator for SourceRecord {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Strip a leading `"Combined "` or `"Combined"` from a field label
///
/// # Examples
///
/// ```
/// use vehicle_lookup::domain::record::clean_field_name;
///
/// assert_eq!(clean_field_name("Combined Engine Size"), "Engine Size");
/// assert_eq!(clean_field_name("CombinedVIN"), "VIN");
/// assert_eq!(clean_field_name("Engine Size"), "Engine Size");
/// ```
pub fn clean_field_name(name: &str) -> &str {
    COMBINED_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}
