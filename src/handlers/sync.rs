use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::{AppError, Result};
use crate::handlers::resolve_params;
use crate::services::sync_service::{self, SyncOptions};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SyncQuery {
    pub code: Option<String>,
    pub season: Option<String>,
    #[serde(rename = "seasonCode")]
    pub season_code: Option<String>,
    /// Comma-separated game numbers to restrict the sync to.
    pub games: Option<String>,
    #[serde(rename = "skipBoxscores")]
    pub skip_boxscores: Option<String>,
}

pub async fn run_sync(
    State(state): State<AppState>,
    Query(query): Query<SyncQuery>,
) -> Result<Response> {
    println!("🔄 GET /api/sync called with query: {:?}", query);
    let start_time = std::time::Instant::now();

    let store = state.store.as_ref().ok_or_else(|| {
        println!("❌ Sync requested without a configured store");
        AppError::configuration("SUPABASE_SERVICE_KEY is not set; sync is disabled")
    })?;

    let (code, season_code) = resolve_params(
        query.code.as_deref(),
        query.season.as_deref(),
        query.season_code.as_deref(),
    );
    let game_filter = query
        .games
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(sync_service::parse_game_filter);
    let skip_boxscores = matches!(
        query.skip_boxscores.as_deref().map(str::trim),
        Some("true") | Some("1") | Some("yes")
    );

    let options = SyncOptions {
        competition: code,
        season_code,
        game_filter,
        skip_boxscores,
    };

    let report = sync_service::run(&state.upstream, store, &options).await?;

    println!(
        "✅ Sync finished in {:?}: {} games, {} player lines",
        start_time.elapsed(),
        report.games_upserted,
        report.players_upserted
    );

    // Partial batch/game failures ride inside the report; the invocation
    // itself still succeeds.
    let mut body = serde_json::to_value(&report)?;
    if let Value::Object(map) = &mut body {
        map.insert("success".to_string(), Value::Bool(true));
    }
    Ok(Json(body).into_response())
}
