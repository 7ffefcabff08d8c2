use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::Deserialize;
use serde_json::json;

use super::service;
use crate::{ApiState, auth::AuthUser, error::ApiError};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/notes/{problem_id}", get(get_note))
        .route("/notes/{problem_id}", put(save_note))
}

async fn get_note(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(problem_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let note = service::get_note(state.store.as_ref(), &auth_user.username, &problem_id).await?;

    Ok(Json(json!({
        "problem_id": problem_id,
        "note_text": note,
    })))
}

#[derive(Debug, Deserialize)]
struct SaveNoteRequest {
    note_text: String,
}

async fn save_note(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(problem_id): Path<String>,
    Json(body): Json<SaveNoteRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    service::save_note(
        state.store.as_ref(),
        &auth_user.username,
        &problem_id,
        &body.note_text,
    )
    .await?;

    Ok(Json(json!({ "message": "Note saved" })))
}
