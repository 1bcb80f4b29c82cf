use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;
use serde_json::json;

use crate::errors::{AppError, Result};
use crate::handlers::{cached_response, resolve_params, wrap_payload};
use crate::state::AppState;

const PLAYER_TTL: i64 = 300;

#[derive(Debug, Deserialize)]
pub struct PlayerQuery {
    #[serde(rename = "personCode")]
    pub person_code: Option<String>,
    pub code: Option<String>,
    pub season: Option<String>,
    #[serde(rename = "seasonCode")]
    pub season_code: Option<String>,
    /// Truthy values switch to the per-season stats feed.
    pub stats: Option<String>,
}

pub async fn get_player(
    State(state): State<AppState>,
    Query(query): Query<PlayerQuery>,
) -> Result<Response> {
    println!("🔍 GET /api/player called with query: {:?}", query);
    let start_time = std::time::Instant::now();

    let person_code = query
        .person_code
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            println!("❌ Missing personCode parameter");
            AppError::validation("personCode query parameter is required")
        })?;

    let (code, season_code) = resolve_params(
        query.code.as_deref(),
        query.season.as_deref(),
        query.season_code.as_deref(),
    );
    let want_stats = matches!(
        query.stats.as_deref().map(str::trim),
        Some("true") | Some("1") | Some("yes")
    );

    let key = format!(
        "player:{}:{}:{}:{}",
        code, season_code, person_code, want_stats
    );
    if let Some(cached) = state.cache.get(&key) {
        println!("✅ Cache hit for {} in {:?}", key, start_time.elapsed());
        return Ok(cached_response(cached, true));
    }
    println!("   → Cache miss for {}, fetching upstream", key);

    let path = if want_stats {
        state.upstream.person_stats_path(&season_code, person_code)
    } else {
        state.upstream.person_path(person_code)
    };
    let payload = state.upstream.get_json(&path).await?;
    let wrapped = wrap_payload(
        payload,
        json!({
            "competition": code,
            "seasonCode": season_code,
            "personCode": person_code,
            "stats": want_stats,
        }),
    );
    state.cache.set(&key, wrapped.clone(), PLAYER_TTL);

    println!(
        "✅ Fetched player {} in {:?}",
        person_code,
        start_time.elapsed()
    );
    Ok(cached_response(wrapped, false))
}
