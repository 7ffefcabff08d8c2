//! The progress ledger.
//!
//! Toggles are flips, not set-to-value: each user click must invert the
//! stored boolean exactly once. A plain read-then-write flip loses one of
//! two concurrent clicks (both read the same prior value, both write the
//! same result), so every toggle goes through a conditional update whose
//! filter requires the field to still differ from the value being written.
//! When the condition misses, another request got there first; we re-read
//! and flip again, bounded.

use std::collections::BTreeMap;

use chrono::Utc;
use ct_store::{Collection, DocStore, Document, Filter, Patch};
use serde_json::json;

use super::model::ProgressEntry;
use crate::error::ApiError;

const TOGGLE_ATTEMPTS: u32 = 3;

/// Flip the solved flag, keeping `solved_at` in lockstep: set to now (UTC)
/// when flipping on, nulled when flipping off.
pub async fn toggle_solved(
    store: &dyn DocStore,
    username: &str,
    problem_id: &str,
) -> Result<ProgressEntry, ApiError> {
    let solved_path = format!("progress.{problem_id}.solved");
    let solved_at_path = format!("progress.{problem_id}.solved_at");

    for _ in 0..TOGGLE_ATTEMPTS {
        let user = find_user(store, username).await?;
        let entry = current_entry(user.as_ref(), problem_id);

        let next = !entry.solved;
        let solved_at = next.then(Utc::now);
        let filter = Filter::new()
            .eq("username", username)
            .ne(solved_path.as_str(), next);
        let patch = Patch::new()
            .set(solved_path.as_str(), next)
            .set(solved_at_path.as_str(), json!(solved_at));

        if apply_toggle(store, user.is_some(), &filter, &patch).await? {
            return Ok(ProgressEntry {
                solved: next,
                solved_at,
                revised: entry.revised,
            });
        }
    }

    Err(ApiError::Conflict(
        "Progress was modified concurrently, please retry".to_string(),
    ))
}

/// Flip the revised flag only; `solved` and `solved_at` are untouched.
pub async fn toggle_revised(
    store: &dyn DocStore,
    username: &str,
    problem_id: &str,
) -> Result<ProgressEntry, ApiError> {
    let revised_path = format!("progress.{problem_id}.revised");

    for _ in 0..TOGGLE_ATTEMPTS {
        let user = find_user(store, username).await?;
        let entry = current_entry(user.as_ref(), problem_id);

        let next = !entry.revised;
        let filter = Filter::new()
            .eq("username", username)
            .ne(revised_path.as_str(), next);
        let patch = Patch::new().set(revised_path.as_str(), next);

        if apply_toggle(store, user.is_some(), &filter, &patch).await? {
            return Ok(ProgressEntry {
                revised: next,
                ..entry
            });
        }
    }

    Err(ApiError::Conflict(
        "Progress was modified concurrently, please retry".to_string(),
    ))
}

/// The user's whole ledger; missing user or missing progress field reads as
/// an empty map.
pub async fn get_progress(
    store: &dyn DocStore,
    username: &str,
) -> Result<BTreeMap<String, ProgressEntry>, ApiError> {
    let user = find_user(store, username).await?;

    let mut progress = BTreeMap::new();
    if let Some(entries) = user
        .as_ref()
        .and_then(|doc| doc.get("progress"))
        .and_then(|value| value.as_object())
    {
        for (problem_id, value) in entries {
            progress.insert(problem_id.clone(), ProgressEntry::from_value(value));
        }
    }
    Ok(progress)
}

async fn find_user(store: &dyn DocStore, username: &str) -> Result<Option<Document>, ApiError> {
    let user = store
        .find_one(Collection::Users, &Filter::new().eq("username", username))
        .await?;
    Ok(user)
}

fn current_entry(user: Option<&Document>, problem_id: &str) -> ProgressEntry {
    user.and_then(|doc| doc.get("progress"))
        .and_then(|progress| progress.get(problem_id))
        .map(ProgressEntry::from_value)
        .unwrap_or_default()
}

/// Apply a conditional toggle. An existing user document takes the
/// compare-and-set path; a missing one is created by upsert, seeded from the
/// filter's username.
async fn apply_toggle(
    store: &dyn DocStore,
    user_exists: bool,
    filter: &Filter,
    patch: &Patch,
) -> Result<bool, ApiError> {
    if user_exists {
        Ok(store.update_one(Collection::Users, filter, patch).await?)
    } else {
        store.upsert_one(Collection::Users, filter, patch).await?;
        Ok(true)
    }
}
