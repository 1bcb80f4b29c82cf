use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;
use serde_json::json;

use crate::errors::{AppError, Result};
use crate::handlers::{cached_response, resolve_params, wrap_payload};
use crate::state::AppState;

const GAMES_TTL: i64 = 300;
const GAME_TTL: i64 = 60;
const BOXSCORE_TTL: i64 = 60;
const PBP_TTL: i64 = 60;

#[derive(Debug, Deserialize)]
pub struct GamesQuery {
    pub season: Option<String>,
    pub code: Option<String>,
    #[serde(rename = "seasonCode")]
    pub season_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GameQuery {
    #[serde(rename = "gameNumber")]
    pub game_number: Option<String>,
    pub season: Option<String>,
    pub code: Option<String>,
    #[serde(rename = "seasonCode")]
    pub season_code: Option<String>,
}

fn require_game_number(raw: Option<&str>) -> Result<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            println!("❌ Missing gameNumber parameter");
            AppError::validation("gameNumber query parameter is required")
        })
}

pub async fn get_games(
    State(state): State<AppState>,
    Query(query): Query<GamesQuery>,
) -> Result<Response> {
    println!("🔍 GET /api/games called with query: {:?}", query);
    let start_time = std::time::Instant::now();

    let (code, season_code) = resolve_params(
        query.code.as_deref(),
        query.season.as_deref(),
        query.season_code.as_deref(),
    );

    let key = format!("games:{}:{}", code, season_code);
    if let Some(cached) = state.cache.get(&key) {
        println!("✅ Cache hit for {} in {:?}", key, start_time.elapsed());
        return Ok(cached_response(cached, true));
    }
    println!("   → Cache miss for {}, fetching upstream", key);

    let path = state.upstream.games_path(&code, &season_code);
    let payload = state.upstream.get_json(&path).await?;
    let wrapped = wrap_payload(
        payload,
        json!({ "competition": code, "seasonCode": season_code }),
    );
    state.cache.set(&key, wrapped.clone(), GAMES_TTL);

    println!(
        "✅ Fetched games for {} in {:?}",
        season_code,
        start_time.elapsed()
    );
    Ok(cached_response(wrapped, false))
}

pub async fn get_game(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
) -> Result<Response> {
    println!("🔍 GET /api/game called with query: {:?}", query);
    let start_time = std::time::Instant::now();

    let game_number = require_game_number(query.game_number.as_deref())?;
    let (code, season_code) = resolve_params(
        query.code.as_deref(),
        query.season.as_deref(),
        query.season_code.as_deref(),
    );

    let key = format!("game:{}:{}:{}", code, season_code, game_number);
    if let Some(cached) = state.cache.get(&key) {
        println!("✅ Cache hit for {} in {:?}", key, start_time.elapsed());
        return Ok(cached_response(cached, true));
    }
    println!("   → Cache miss for {}, fetching upstream", key);

    let path = state.upstream.game_path(&code, &season_code, &game_number);
    let payload = state.upstream.get_json(&path).await?;
    let wrapped = wrap_payload(
        payload,
        json!({
            "competition": code,
            "seasonCode": season_code,
            "gameNumber": game_number,
        }),
    );
    state.cache.set(&key, wrapped.clone(), GAME_TTL);

    println!(
        "✅ Fetched game {} for {} in {:?}",
        game_number,
        season_code,
        start_time.elapsed()
    );
    Ok(cached_response(wrapped, false))
}

pub async fn get_boxscore(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
) -> Result<Response> {
    println!("🔍 GET /api/boxscore called with query: {:?}", query);
    let start_time = std::time::Instant::now();

    let game_number = require_game_number(query.game_number.as_deref())?;
    let (code, season_code) = resolve_params(
        query.code.as_deref(),
        query.season.as_deref(),
        query.season_code.as_deref(),
    );

    let key = format!("boxscore:{}:{}:{}", code, season_code, game_number);
    if let Some(cached) = state.cache.get(&key) {
        println!("✅ Cache hit for {} in {:?}", key, start_time.elapsed());
        return Ok(cached_response(cached, true));
    }
    println!("   → Cache miss for {}, fetching upstream", key);

    let path = state
        .upstream
        .boxscore_path(&code, &season_code, &game_number);
    let payload = state.upstream.get_json(&path).await?;
    let wrapped = wrap_payload(
        payload,
        json!({
            "competition": code,
            "seasonCode": season_code,
            "gameNumber": game_number,
        }),
    );
    state.cache.set(&key, wrapped.clone(), BOXSCORE_TTL);

    println!(
        "✅ Fetched boxscore {} for {} in {:?}",
        game_number,
        season_code,
        start_time.elapsed()
    );
    Ok(cached_response(wrapped, false))
}

pub async fn get_playbyplay(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
) -> Result<Response> {
    println!("🔍 GET /api/pbp called with query: {:?}", query);
    let start_time = std::time::Instant::now();

    let game_number = require_game_number(query.game_number.as_deref())?;
    let (code, season_code) = resolve_params(
        query.code.as_deref(),
        query.season.as_deref(),
        query.season_code.as_deref(),
    );

    let key = format!("pbp:{}:{}:{}", code, season_code, game_number);
    if let Some(cached) = state.cache.get(&key) {
        println!("✅ Cache hit for {} in {:?}", key, start_time.elapsed());
        return Ok(cached_response(cached, true));
    }
    println!("   → Cache miss for {}, fetching upstream", key);

    let path = state
        .upstream
        .playbyplay_path(&code, &season_code, &game_number);
    let payload = state.upstream.get_json(&path).await?;
    let wrapped = wrap_payload(
        payload,
        json!({
            "competition": code,
            "seasonCode": season_code,
            "gameNumber": game_number,
        }),
    );
    state.cache.set(&key, wrapped.clone(), PBP_TTL);

    println!(
        "✅ Fetched play-by-play {} for {} in {:?}",
        game_number,
        season_code,
        start_time.elapsed()
    );
    Ok(cached_response(wrapped, false))
}
