use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};

use crate::{account, activity, auth, catalog, notes, progress, state::ApiState};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .merge(auth::routes())
        .merge(catalog::routes())
        .merge(progress::routes())
        .merge(notes::routes())
        .merge(activity::routes())
        .merge(account::routes())
        .fallback(handler_404)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}
