use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;
use serde_json::json;

use crate::errors::Result;
use crate::handlers::{cached_response, resolve_params, wrap_payload};
use crate::state::AppState;

const STANDINGS_TTL: i64 = 300;
const ROUNDS_TTL: i64 = 300;

#[derive(Debug, Deserialize)]
pub struct StandingsQuery {
    pub season: Option<String>,
    pub code: Option<String>,
    #[serde(rename = "seasonCode")]
    pub season_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoundsQuery {
    pub season: Option<String>,
    pub code: Option<String>,
    #[serde(rename = "seasonCode")]
    pub season_code: Option<String>,
    pub round: Option<String>,
}

pub async fn get_standings(
    State(state): State<AppState>,
    Query(query): Query<StandingsQuery>,
) -> Result<Response> {
    println!("🔍 GET /api/standings called with query: {:?}", query);
    let start_time = std::time::Instant::now();

    let (code, season_code) = resolve_params(
        query.code.as_deref(),
        query.season.as_deref(),
        query.season_code.as_deref(),
    );

    let key = format!("standings:{}:{}", code, season_code);
    if let Some(cached) = state.cache.get(&key) {
        println!("✅ Cache hit for {} in {:?}", key, start_time.elapsed());
        return Ok(cached_response(cached, true));
    }
    println!("   → Cache miss for {}, fetching upstream", key);

    let path = state.upstream.standings_path(&code, &season_code);
    let payload = state.upstream.get_json(&path).await?;
    let wrapped = wrap_payload(
        payload,
        json!({ "competition": code, "seasonCode": season_code }),
    );
    state.cache.set(&key, wrapped.clone(), STANDINGS_TTL);

    println!(
        "✅ Fetched standings for {} in {:?}",
        season_code,
        start_time.elapsed()
    );
    Ok(cached_response(wrapped, false))
}

pub async fn get_rounds(
    State(state): State<AppState>,
    Query(query): Query<RoundsQuery>,
) -> Result<Response> {
    println!("🔍 GET /api/rounds called with query: {:?}", query);
    let start_time = std::time::Instant::now();

    let (code, season_code) = resolve_params(
        query.code.as_deref(),
        query.season.as_deref(),
        query.season_code.as_deref(),
    );
    let round = query
        .round
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    let key = format!(
        "rounds:{}:{}:{}",
        code,
        season_code,
        round.unwrap_or("all")
    );
    if let Some(cached) = state.cache.get(&key) {
        println!("✅ Cache hit for {} in {:?}", key, start_time.elapsed());
        return Ok(cached_response(cached, true));
    }
    println!("   → Cache miss for {}, fetching upstream", key);

    let path = state.upstream.rounds_path(&code, &season_code, round);
    let payload = state.upstream.get_json(&path).await?;
    let wrapped = wrap_payload(
        payload,
        json!({
            "competition": code,
            "seasonCode": season_code,
            "round": round,
        }),
    );
    state.cache.set(&key, wrapped.clone(), ROUNDS_TTL);

    println!(
        "✅ Fetched rounds for {} in {:?}",
        season_code,
        start_time.elapsed()
    );
    Ok(cached_response(wrapped, false))
}
