//! Best-effort lookups of linked external practice accounts.
//!
//! These calls are decoration on the account page: any failure (network,
//! non-200, unexpected body) degrades to `None`, which the route renders as
//! `"N/A"`. Nothing here may fail the request.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Total solved count from the public LeetCode stats API.
pub async fn fetch_leetcode_solved(client: &reqwest::Client, username: &str) -> Option<u64> {
    let url = format!("https://leetcode-stats-api.herokuapp.com/{username}");
    let response = client
        .get(url)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?;

    let body: serde_json::Value = response.json().await.ok()?;
    body.get("totalSolved")?.as_u64()
}

/// Coding score scraped from the GeeksforGeeks practice profile page.
pub async fn fetch_gfg_score(client: &reqwest::Client, username: &str) -> Option<String> {
    let url = format!("https://auth.geeksforgeeks.org/user/{username}/practice/");
    let response = client
        .get(url)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?;

    let html = response.text().await.ok()?;
    extract_gfg_score(&html)
}

/// Pull the first score_card_value cell out of the profile HTML.
fn extract_gfg_score(html: &str) -> Option<String> {
    static SCORE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"score_card_value[^>]*>\s*([0-9]+)\s*<"#).expect("valid regex")
    });

    SCORE_RE
        .captures(html)
        .map(|captures| captures[1].to_string())
}
