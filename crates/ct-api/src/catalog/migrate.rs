//! Startup migration of legacy catalog documents.
//!
//! Older imports wrote a scalar `company` field, matched rows by `name`, and
//! stored no `id`. The canonical shape keys by `link` with a set-valued
//! `company_tag`. Running this at startup converts whatever legacy documents
//! remain; it is idempotent, so every boot can run it unconditionally.

use ct_store::{Collection, DocStore, Filter, Patch};
use serde_json::Value;
use uuid::Uuid;

use super::model::normalize_difficulty;
use crate::error::ApiError;

/// Convert legacy-shaped problem documents in place.
///
/// Returns the number of documents rewritten.
pub async fn migrate_legacy_schema(store: &dyn DocStore) -> Result<u64, ApiError> {
    let docs = store
        .find(Collection::Problems, &Filter::new(), None)
        .await?;

    let mut migrated = 0;
    for doc in &docs {
        let Some(patch) = legacy_patch(doc) else {
            continue;
        };
        let Some(filter) = identity_filter(doc) else {
            // No name and no link: nothing to key the update on.
            tracing::warn!("skipping unidentifiable legacy problem document");
            continue;
        };
        if store.update_one(Collection::Problems, &filter, &patch).await? {
            migrated += 1;
        }
    }

    if migrated > 0 {
        tracing::info!(migrated, "migrated legacy catalog documents");
    }
    Ok(migrated)
}

/// The patch canonicalizing `doc`, or `None` when it is already canonical.
fn legacy_patch(doc: &Value) -> Option<Patch> {
    let mut patch = Patch::new();
    let mut dirty = false;

    if let Some(company) = doc.get("company").and_then(Value::as_str) {
        patch = patch.add_to_set("company_tag", company).unset("company");
        dirty = true;
    }

    if doc.get("id").is_none() {
        patch = patch.set("id", Uuid::new_v4().to_string());
        dirty = true;
    }

    if let Some(difficulty) = doc.get("difficulty").and_then(Value::as_str) {
        let normalized = normalize_difficulty(difficulty);
        if normalized != difficulty {
            patch = patch.set("difficulty", normalized);
            dirty = true;
        }
    }

    dirty.then_some(patch)
}

/// Pin the document to update: by `link` when it has a real one, falling
/// back to `name` for legacy rows imported with the `"#"` placeholder link.
fn identity_filter(doc: &Value) -> Option<Filter> {
    if let Some(link) = doc.get("link").and_then(Value::as_str).filter(|l| *l != "#") {
        return Some(Filter::new().eq("link", link));
    }
    doc.get("name")
        .and_then(Value::as_str)
        .map(|name| Filter::new().eq("name", name))
}
