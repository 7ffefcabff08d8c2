use axum::{Json, Router, extract::State, routing::get};
use chrono::{DateTime, Utc};
use ct_heatmap::{WINDOW_DAYS, build_heatmap};
use serde_json::json;

use crate::{ApiState, auth::AuthUser, error::ApiError, progress};

pub fn routes() -> Router<ApiState> {
    Router::new().route("/activity/heatmap", get(heatmap))
}

/// Daily solve counts for the trailing year, derived from the caller's
/// progress ledger. Only entries that are solved with a recorded timestamp
/// contribute.
async fn heatmap(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ledger = progress::service::get_progress(state.store.as_ref(), &auth_user.username).await?;

    let solve_times: Vec<DateTime<Utc>> = ledger
        .values()
        .filter(|entry| entry.solved)
        .filter_map(|entry| entry.solved_at)
        .collect();

    let days = build_heatmap(&solve_times, WINDOW_DAYS, Utc::now().date_naive());

    Ok(Json(json!({
        "window_days": WINDOW_DAYS,
        "days": days,
    })))
}
