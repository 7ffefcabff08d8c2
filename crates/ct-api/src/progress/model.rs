use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-user, per-problem state, stored sparsely under
/// `progress.<problem_id>` in the user document.
///
/// Invariant: `solved_at` is non-null exactly when `solved` is true. The
/// toggle operations maintain it; nothing else writes these fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    #[serde(default)]
    pub solved: bool,
    #[serde(default)]
    pub solved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub revised: bool,
}

impl ProgressEntry {
    /// Read an entry out of a raw progress value; missing fields default.
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}
