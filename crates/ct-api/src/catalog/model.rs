//! Problem-catalog vocabulary and the per-field CSV parsers.
//!
//! Catalog documents stay loosely typed end to end; the canonical shape is
//! `{id, name, link, difficulty, acceptance, topics, company_tag}` with
//! `link` as the identity key and `company_tag` set-valued. Field parsing
//! never fails: anything unparseable becomes the `"N/A"` sentinel.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed page size of the problem list.
pub const PAGE_SIZE: usize = 25;

/// Sentinel stored when a difficulty or acceptance rate is absent or
/// unparseable.
pub const NOT_AVAILABLE: &str = "N/A";

/// Per-row outcome counts of a CSV import.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: u64,
    pub updated: u64,
    pub skipped: u64,
}

/// Maps catalog fields onto CSV header names.
///
/// `name` and `link` are required (rows need an identity); the rest default
/// to the sentinel / empty when unmapped.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMapping {
    pub name: String,
    pub link: String,
    pub difficulty: Option<String>,
    pub acceptance: Option<String>,
    pub topics: Option<String>,
}

/// Uppercase-normalize a difficulty for storage; blank becomes `"N/A"`.
pub fn normalize_difficulty(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        trimmed.to_uppercase()
    }
}

/// Parse an acceptance rate like `"54.3%"` into a number, or the `"N/A"`
/// sentinel when the value does not parse.
pub fn parse_acceptance(raw: &str) -> Value {
    let cleaned = raw.replace('%', "");
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map_or_else(|| Value::String(NOT_AVAILABLE.to_string()), Value::Number)
}

/// Split a comma-separated topics cell into trimmed, non-empty topics.
pub fn parse_topics(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|topic| !topic.is_empty())
        .map(str::to_string)
        .collect()
}
