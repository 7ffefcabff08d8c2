//! Per-user, per-problem notes.
//!
//! A note is one document keyed by `(problem_id, username)`; saving replaces
//! the whole text, last write wins. Both operations are scoped by the
//! authenticated username, so notes never cross users.

use ct_store::{Collection, DocStore, Filter, Patch};

use crate::error::ApiError;

fn note_key(username: &str, problem_id: &str) -> Filter {
    Filter::new()
        .eq("problem_id", problem_id)
        .eq("username", username)
}

/// The user's note for a problem; empty string when none was saved.
pub async fn get_note(
    store: &dyn DocStore,
    username: &str,
    problem_id: &str,
) -> Result<String, ApiError> {
    let note = store
        .find_one(Collection::Notes, &note_key(username, problem_id))
        .await?;

    Ok(note
        .and_then(|doc| doc.get("note_text").and_then(|text| text.as_str().map(String::from)))
        .unwrap_or_default())
}

/// Save (upsert) the user's note for a problem, replacing any previous text.
pub async fn save_note(
    store: &dyn DocStore,
    username: &str,
    problem_id: &str,
    text: &str,
) -> Result<(), ApiError> {
    store
        .upsert_one(
            Collection::Notes,
            &note_key(username, problem_id),
            &Patch::new().set("note_text", text),
        )
        .await?;

    Ok(())
}
