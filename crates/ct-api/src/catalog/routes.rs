use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::json;

use super::model::{ColumnMapping, ImportSummary, PAGE_SIZE};
use super::service::{self, CatalogFilter};
use super::{import, model::parse_topics};
use crate::{ApiState, auth::AuthUser, error::ApiError};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/problems", get(list_problems))
        .route("/problems/filters", get(filter_choices))
        .route("/problems/random", get(random_problem))
        .route("/problems/import", post(import_csv))
}

#[derive(Debug, Default, Deserialize)]
struct ProblemsQuery {
    company: Option<String>,
    difficulty: Option<String>,
    /// Comma-separated; all listed topics must match.
    topics: Option<String>,
    /// 1-based page number.
    page: Option<usize>,
}

impl ProblemsQuery {
    fn catalog_filter(&self) -> CatalogFilter {
        CatalogFilter {
            company: self.company.clone(),
            difficulty: self.difficulty.clone(),
            topics: self.topics.as_deref().map(parse_topics).unwrap_or_default(),
        }
    }
}

async fn list_problems(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
    Query(params): Query<ProblemsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let problems = service::query(state.store.as_ref(), &params.catalog_filter()).await?;

    let total = problems.len();
    let pages = total.div_ceil(PAGE_SIZE).max(1);
    let page = params.page.unwrap_or(1).clamp(1, pages);
    let start = (page - 1) * PAGE_SIZE;
    let page_items: Vec<_> = problems.into_iter().skip(start).take(PAGE_SIZE).collect();

    Ok(Json(json!({
        "problems": page_items,
        "total": total,
        "page": page,
        "pages": pages,
        "page_size": PAGE_SIZE,
    })))
}

async fn filter_choices(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = state.store.as_ref();
    let companies = service::distinct_values(store, "company_tag").await?;
    let difficulties = service::distinct_values(store, "difficulty").await?;
    let topics = service::distinct_values(store, "topics").await?;

    Ok(Json(json!({
        "companies": companies,
        "difficulties": difficulties,
        "topics": topics,
    })))
}

async fn random_problem(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
    Query(params): Query<ProblemsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let problems = service::query(state.store.as_ref(), &params.catalog_filter()).await?;

    let picked = problems
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| ApiError::NotFound("No problems match the filters".to_string()))?;

    Ok(Json(picked))
}

#[derive(Debug, Deserialize)]
struct ImportRequest {
    company: String,
    mapping: ColumnMapping,
    csv: String,
}

async fn import_csv(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(body): Json<ImportRequest>,
) -> Result<Json<ImportSummary>, ApiError> {
    let summary = import::upsert_from_import(
        state.store.as_ref(),
        &body.company,
        &body.mapping,
        &body.csv,
    )
    .await?;

    Ok(Json(summary))
}
