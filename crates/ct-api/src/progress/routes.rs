use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use std::collections::BTreeMap;

use super::{model::ProgressEntry, service};
use crate::{ApiState, auth::AuthUser, error::ApiError};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/progress", get(get_progress))
        .route("/progress/{problem_id}/solve", post(toggle_solved))
        .route("/progress/{problem_id}/revise", post(toggle_revised))
}

async fn get_progress(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<BTreeMap<String, ProgressEntry>>, ApiError> {
    let progress = service::get_progress(state.store.as_ref(), &auth_user.username).await?;
    Ok(Json(progress))
}

async fn toggle_solved(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(problem_id): Path<String>,
) -> Result<Json<ProgressEntry>, ApiError> {
    let entry =
        service::toggle_solved(state.store.as_ref(), &auth_user.username, &problem_id).await?;
    Ok(Json(entry))
}

async fn toggle_revised(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(problem_id): Path<String>,
) -> Result<Json<ProgressEntry>, ApiError> {
    let entry =
        service::toggle_revised(state.store.as_ref(), &auth_user.username, &problem_id).await?;
    Ok(Json(entry))
}
