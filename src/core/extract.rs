//! Embedded JSON extraction
//!
//! Pulls one JSON object out of an HTML page without parsing the page. The
//! page is searched for a marker key, the object held as its value is
//! delimited with a string-aware brace scan, and the slice is parsed with
//! `serde_json`.
//!
//! Pages emit the object either as plain JSON or inside a JSON-encoded
//! string (`\"VrmDetails\":{\"Make\":...}`), so both spellings are handled.

use serde_json::{Map, Value};

/// Parsed JSON object
pub type JsonObject = Map<String, Value>;

/// Find the object stored under `marker` and parse it
///
/// The object must be the marker's value: only a `:` and whitespace may sit
/// between the marker and the opening `{`. Occurrences where the marker is
/// a string value or holds a non-object are skipped in favour of later ones.
/// Returns `None` when no occurrence yields an object that parses, raw or
/// unescaped.
///
/// # Examples
///
/// ```
/// use vehicle_lookup::core::extract::extract_embedded_json;
///
/// let html = r#"<script>window.state = {"VrmDetails":{"Make":"Ford"}};</script>"#;
/// let object = extract_embedded_json(html, "VrmDetails").unwrap();
/// assert_eq!(object["Make"], "Ford");
/// ```
pub fn extract_embedded_json(text: &str, marker: &str) -> Option<JsonObject> {
    let bytes = text.as_bytes();
    marker_variants(marker).iter().find_map(|variant| {
        text.match_indices(variant.as_str()).find_map(|(pos, _)| {
            let start = value_start(bytes, pos + variant.len(), variant.ends_with(':'))?;
            let end = find_object_end(bytes, start)?;
            parse_candidate(&text[start..=end])
        })
    })
}

/// Accepted spellings of the marker, in the order they are tried
fn marker_variants(marker: &str) -> [String; 4] {
    [
        format!("\"{marker}\":"),
        format!("\\\"{marker}\\\":"),
        format!("\"{marker}\""),
        format!("\\\"{marker}\\\""),
    ]
}

/// Index of the `{` opening the value that follows a marker ending at `pos`
fn value_start(bytes: &[u8], pos: usize, has_colon: bool) -> Option<usize> {
    let mut pos = skip_whitespace(bytes, pos);
    if !has_colon {
        if bytes.get(pos) != Some(&b':') {
            return None;
        }
        pos = skip_whitespace(bytes, pos + 1);
    }
    (bytes.get(pos) == Some(&b'{')).then_some(pos)
}

fn skip_whitespace(bytes: &[u8], pos: usize) -> usize {
    pos + bytes[pos..]
        .iter()
        .take_while(|b| b.is_ascii_whitespace())
        .count()
}

/// Index of the `}` closing the object that opens at `start`
///
/// A backslash escapes the following byte wherever it appears, so the
/// `\"` pairs of an escaped blob never toggle string state. Braces only
/// count outside strings. Every delimiter is ASCII, so byte indices are
/// always char boundaries.
fn find_object_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match byte {
            b'\\' => escape_next = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_candidate(candidate: &str) -> Option<JsonObject> {
    if let Ok(object) = serde_json::from_str::<JsonObject>(candidate) {
        return Some(object);
    }

    let unescaped = unescape(candidate);
    match serde_json::from_str::<JsonObject>(&unescaped) {
        Ok(object) => Some(object),
        Err(e) => {
            tracing::debug!(error = %e, len = candidate.len(), "Embedded object is not valid JSON");
            None
        }
    }
}

/// Undo one level of JSON string encoding (`\"` → `"`, `\\` → `\`)
fn unescape(candidate: &str) -> String {
    candidate.replace("\\\"", "\"").replace("\\\\", "\\")
}
