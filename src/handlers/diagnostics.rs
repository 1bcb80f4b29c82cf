use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::state::AppState;

// Diagnostics only: enumerates every live cache key, so the response grows
// with the key space.
pub async fn cache_stats(State(state): State<AppState>) -> Json<Value> {
    let stats = state.cache.stats();
    Json(json!({
        "entries": stats.entries,
        "keys": stats.keys,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
