use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};
use ct_store::{Collection, DocStore, Filter, Patch};
use serde::Deserialize;
use serde_json::{Value, json};

use super::external;
use crate::{ApiState, auth::AuthUser, catalog, error::ApiError, progress};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/account", get(account_summary))
        .route("/account/external", put(save_external_accounts))
        .route("/account/external-stats", get(external_stats))
}

/// Totals for the account page: catalog size, the caller's solved and
/// revised counts, and any linked external usernames.
async fn account_summary(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store.as_ref();

    let total_problems = catalog::service::count_all(store).await?;
    let ledger = progress::service::get_progress(store, &auth_user.username).await?;
    let solved = ledger.values().filter(|entry| entry.solved).count();
    let revised = ledger.values().filter(|entry| entry.revised).count();

    let accounts = external_accounts(store, &auth_user.username).await?;

    Ok(Json(json!({
        "username": auth_user.username,
        "total_problems": total_problems,
        "solved": solved,
        "revised": revised,
        "external_accounts": accounts,
    })))
}

#[derive(Debug, Deserialize)]
struct ExternalAccountsRequest {
    #[serde(default)]
    leetcode: String,
    #[serde(default)]
    gfg: String,
}

async fn save_external_accounts(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(body): Json<ExternalAccountsRequest>,
) -> Result<Json<Value>, ApiError> {
    state
        .store
        .upsert_one(
            Collection::Users,
            &Filter::new().eq("username", auth_user.username.as_str()),
            &Patch::new()
                .set("external_accounts.leetcode", body.leetcode.trim())
                .set("external_accounts.gfg", body.gfg.trim()),
        )
        .await?;

    Ok(Json(json!({ "message": "External accounts saved" })))
}

/// Live numbers from the linked accounts, fetched best-effort: an unlinked
/// or unreachable account reads as `"N/A"`, never an error.
async fn external_stats(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Value>, ApiError> {
    let accounts = external_accounts(state.store.as_ref(), &auth_user.username).await?;

    let leetcode_solved = match accounts.leetcode.as_deref() {
        Some(username) if !username.is_empty() => {
            external::fetch_leetcode_solved(&state.http, username)
                .await
                .map_or_else(|| json!("N/A"), |solved| json!(solved))
        }
        _ => json!("N/A"),
    };

    let gfg_score = match accounts.gfg.as_deref() {
        Some(username) if !username.is_empty() => external::fetch_gfg_score(&state.http, username)
            .await
            .map_or_else(|| json!("N/A"), |score| json!(score)),
        _ => json!("N/A"),
    };

    Ok(Json(json!({
        "leetcode_solved": leetcode_solved,
        "gfg_score": gfg_score,
    })))
}

#[derive(Debug, Default, serde::Serialize)]
struct ExternalAccounts {
    leetcode: Option<String>,
    gfg: Option<String>,
}

async fn external_accounts(
    store: &dyn DocStore,
    username: &str,
) -> Result<ExternalAccounts, ApiError> {
    let user = store
        .find_one(Collection::Users, &Filter::new().eq("username", username))
        .await?;

    let accounts = user
        .as_ref()
        .and_then(|doc| doc.get("external_accounts"))
        .map(|value| ExternalAccounts {
            leetcode: value.get("leetcode").and_then(Value::as_str).map(String::from),
            gfg: value.get("gfg").and_then(Value::as_str).map(String::from),
        })
        .unwrap_or_default();

    Ok(accounts)
}
