//! Vehicle identifier type with canonicalization
//!
//! A VRM (vehicle registration mark) is always held in canonical form:
//! uppercase with every whitespace character removed. Two inputs that
//! canonicalize identically are the same vehicle and share one cache entry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a canonical VRM
pub const MAX_VRM_LEN: usize = 8;

/// Vehicle registration mark newtype wrapper
///
/// # Examples
///
/// ```
/// use vehicle_lookup::domain::ids::Vrm;
///
/// let vrm = Vrm::new(" ab 12 cde").unwrap();
/// assert_eq!(vrm.as_str(), "AB12CDE");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Vrm(String);

impl Vrm {
    /// Creates a new Vrm from any spelling of the identifier
    ///
    /// The input is canonicalized first, then checked to be 1-8 ASCII
    /// alphanumerics.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, String> {
        let canonical = canonicalize(raw.as_ref());
        if canonical.is_empty() {
            return Err("VRM cannot be empty".to_string());
        }
        if canonical.len() > MAX_VRM_LEN {
            return Err(format!(
                "VRM must be at most {MAX_VRM_LEN} characters, got {}",
                canonical.len()
            ));
        }
        if !canonical.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!("VRM must be alphanumeric, got '{canonical}'"));
        }
        Ok(Self(canonical))
    }

    /// Returns the canonical VRM as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Canonical form of an identifier: uppercase, all whitespace removed
///
/// Idempotent: `canonicalize(&canonicalize(x)) == canonicalize(x)`.
pub fn canonicalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Checks a raw path segment against `^[A-Za-z0-9]{1,8}$`
pub fn is_valid_path_identifier(raw: &str) -> bool {
    (1..=MAX_VRM_LEN).contains(&raw.len()) && raw.bytes().all(|b| b.is_ascii_alphanumeric())
}

impl fmt::Display for Vrm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Vrm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Vrm {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Vrm> for String {
    fn from(vrm: Vrm) -> Self {
        vrm.0
    }
}

impl AsRef<str> for Vrm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
