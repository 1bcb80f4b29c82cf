// services/sync_service.rs
//
// The sync pipeline mirrors upstream games (and their player boxscore
// lines) into the secondary store. Four stages per invocation:
//
//   1. fetch the season's game list        — fatal on a shape mismatch
//   2. optional game-number filter         — unmatched numbers drop silently
//   3. flatten + upsert games in batches   — per-batch errors, never fatal
//   4. boxscore fan-out (5 at a time) +
//      player-line flatten + upsert        — per-game errors, never fatal
//
// The pipeline is expected to run repeatedly on a schedule; a partial
// failure self-heals on the next run, so the report carries the errors
// inline instead of failing the invocation.

use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::{AppError, Result};
use crate::services::supabase::{SupabaseStore, UPSERT_BATCH_SIZE};
use crate::services::transform;
use crate::services::upstream::UpstreamClient;

/// Simultaneous boxscore fetches. Chunks are strictly sequential: a chunk's
/// calls are issued together and awaited together before the next starts.
pub const BOXSCORE_CONCURRENCY: usize = 5;

const REPORTED_ERRORS_PER_STAGE: usize = 5;

pub const GAMES_TABLE: &str = "games";
pub const PLAYER_STATS_TABLE: &str = "player_stats";
pub const GAMES_CONFLICT: &str = "season_code,game_code";
pub const PLAYER_STATS_CONFLICT: &str = "season_code,game_code,person_code";

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub competition: String,
    pub season_code: String,
    /// Explicit game numbers to sync; None syncs the whole list.
    pub game_filter: Option<Vec<i64>>,
    pub skip_boxscores: bool,
}

#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub games_found: usize,
    pub games_upserted: usize,
    pub game_errors: Vec<String>,
    pub boxscores_eligible: usize,
    pub boxscores_fetched: usize,
    pub players_upserted: usize,
    pub boxscore_errors: Vec<String>,
}

pub async fn run(
    upstream: &UpstreamClient,
    store: &SupabaseStore,
    options: &SyncOptions,
) -> Result<SyncReport> {
    info!(
        "Sync starting for {} {} (filter: {:?}, skip_boxscores: {})",
        options.competition, options.season_code, options.game_filter, options.skip_boxscores
    );

    // Stage 1: fetch the game list. Anything that is neither a list nor an
    // object exposing one is fatal for the whole invocation.
    let games_path = upstream.games_path(&options.competition, &options.season_code);
    let payload = upstream.get_json(&games_path).await?;
    let mut games = extract_game_list(&payload)?;

    // Stage 2: optional filter. Requested numbers with no matching game are
    // dropped without an error.
    if let Some(filter) = &options.game_filter {
        games.retain(|game| {
            transform::pick_i64(game, transform::GAME_CODE_KEYS)
                .map(|code| filter.contains(&code))
                .unwrap_or(false)
        });
    }
    let games_found = games.len();
    info!("Sync found {} games after filtering", games_found);

    // Stage 3: flatten and upsert game rows. A failed batch is recorded and
    // the remaining batches still run.
    let game_rows: Vec<Value> = games
        .iter()
        .filter_map(|game| transform::game_row(game, &options.competition, &options.season_code))
        .filter_map(|row| serde_json::to_value(row).ok())
        .collect();

    let mut game_errors = Vec::new();
    let games_upserted =
        upsert_batched(store, GAMES_TABLE, GAMES_CONFLICT, &game_rows, &mut game_errors).await;

    // Stage 4: boxscore fan-out, bounded at BOXSCORE_CONCURRENCY. Each
    // per-game failure is caught individually; siblings and the overall
    // sync continue.
    let mut boxscores_eligible = 0;
    let mut boxscores_fetched = 0;
    let mut players_upserted = 0;
    let mut boxscore_errors = Vec::new();

    if !options.skip_boxscores {
        let eligible: Vec<i64> = games
            .iter()
            .filter(|game| transform::is_eligible(game))
            .filter_map(|game| transform::pick_i64(game, transform::GAME_CODE_KEYS))
            .collect();
        boxscores_eligible = eligible.len();

        let mut player_rows: Vec<Value> = Vec::new();
        for chunk in eligible.chunks(BOXSCORE_CONCURRENCY) {
            let fetches = chunk.iter().map(|&game_code| {
                let path = upstream.boxscore_path(
                    &options.competition,
                    &options.season_code,
                    &game_code.to_string(),
                );
                async move { (game_code, upstream.get_json(&path).await) }
            });

            for (game_code, outcome) in join_all(fetches).await {
                match outcome {
                    Ok(boxscore) => {
                        boxscores_fetched += 1;
                        for row in
                            transform::player_rows(&boxscore, &options.season_code, game_code)
                        {
                            if let Ok(value) = serde_json::to_value(&row) {
                                player_rows.push(value);
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Boxscore fetch failed for game {}: {}", game_code, e);
                        boxscore_errors.push(format!("Game {}: {}", game_code, e));
                    }
                }
            }
        }

        players_upserted = upsert_batched(
            store,
            PLAYER_STATS_TABLE,
            PLAYER_STATS_CONFLICT,
            &player_rows,
            &mut boxscore_errors,
        )
        .await;
    }

    info!(
        "Sync finished: {}/{} games upserted, {}/{} boxscores fetched, {} player lines",
        games_upserted, games_found, boxscores_fetched, boxscores_eligible, players_upserted
    );

    game_errors.truncate(REPORTED_ERRORS_PER_STAGE);
    boxscore_errors.truncate(REPORTED_ERRORS_PER_STAGE);

    Ok(SyncReport {
        games_found,
        games_upserted,
        game_errors,
        boxscores_eligible,
        boxscores_fetched,
        players_upserted,
        boxscore_errors,
    })
}

/// Parses the caller-supplied comma-separated game numbers; tokens are
/// trimmed, non-integers are ignored.
pub fn parse_game_filter(raw: &str) -> Vec<i64> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<i64>().ok())
        .collect()
}

/// The upstream list either is the payload or hides under a known key.
fn extract_game_list(payload: &Value) -> Result<Vec<Value>> {
    if let Some(list) = payload.as_array() {
        return Ok(list.clone());
    }
    for key in ["data", "games", "items"] {
        if let Some(list) = payload.get(key).and_then(Value::as_array) {
            return Ok(list.clone());
        }
    }
    Err(AppError::UnexpectedPayload(
        "games response is neither a list nor an object with a games list".to_string(),
    ))
}

async fn upsert_batched(
    store: &SupabaseStore,
    table: &str,
    on_conflict: &str,
    rows: &[Value],
    errors: &mut Vec<String>,
) -> usize {
    let mut upserted = 0;
    for batch in rows.chunks(UPSERT_BATCH_SIZE) {
        match store.upsert(table, on_conflict, batch).await {
            Ok(()) => upserted += batch.len(),
            Err(e) => {
                warn!("Batch upsert into {} failed: {}", table, e);
                errors.push(format!("Batch upsert into {} failed: {}", table, e));
            }
        }
    }
    upserted
}
