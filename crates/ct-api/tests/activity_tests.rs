use axum::http::StatusCode;
use ct_api::router;

use crate::common::{self, TestClient};

#[tokio::test]
async fn test_heatmap_requires_authentication() {
    let state = common::test_state();
    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client.get("/activity/heatmap").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_heatmap_covers_the_trailing_year() {
    let state = common::test_state();
    let app = router::router().with_state(state.clone());
    let client = TestClient::new(app);

    let token = common::jwt::create_test_token("alice", &state.auth.jwt_secret);
    let response = client
        .get_with_auth("/activity/heatmap", &token, &state.cookie_key)
        .await;

    response.assert_status(StatusCode::OK);

    let json: serde_json::Value = response.json();
    assert_eq!(json["window_days"], 365);

    let days = json["days"].as_array().unwrap();
    assert_eq!(days.len(), 365);
    assert!(days.iter().all(|day| day["count"] == 0));
}

#[tokio::test]
async fn test_solves_show_up_in_todays_bucket() {
    let state = common::test_state();
    let app = router::router().with_state(state.clone());
    let client = TestClient::new(app);

    common::seed::user(&state, "alice").await;

    let token = common::jwt::create_test_token("alice", &state.auth.jwt_secret);
    client
        .post_with_auth("/progress/p1/solve", &token, &state.cookie_key)
        .await;
    client
        .post_with_auth("/progress/p2/solve", &token, &state.cookie_key)
        .await;

    let response = client
        .get_with_auth("/activity/heatmap", &token, &state.cookie_key)
        .await;

    let json: serde_json::Value = response.json();
    let days = json["days"].as_array().unwrap();

    // The window ends today, so both solves land in the final cell
    let today = days.last().unwrap();
    assert_eq!(today["count"], 2);

    let total: u64 = days.iter().map(|day| day["count"].as_u64().unwrap()).sum();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn test_unsolved_entries_do_not_count() {
    let state = common::test_state();
    let app = router::router().with_state(state.clone());
    let client = TestClient::new(app);

    common::seed::user(&state, "alice").await;

    let token = common::jwt::create_test_token("alice", &state.auth.jwt_secret);

    // Solve then un-solve; the ledger entry remains but must not count
    client
        .post_with_auth("/progress/p1/solve", &token, &state.cookie_key)
        .await;
    client
        .post_with_auth("/progress/p1/solve", &token, &state.cookie_key)
        .await;

    // A revision alone is not a solve either
    client
        .post_with_auth("/progress/p2/revise", &token, &state.cookie_key)
        .await;

    let response = client
        .get_with_auth("/activity/heatmap", &token, &state.cookie_key)
        .await;

    let json: serde_json::Value = response.json();
    let total: u64 = json["days"]
        .as_array()
        .unwrap()
        .iter()
        .map(|day| day["count"].as_u64().unwrap())
        .sum();
    assert_eq!(total, 0);
}
