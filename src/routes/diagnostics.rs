use axum::{routing::get, Router};

use crate::handlers::diagnostics;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/cache", get(diagnostics::cache_stats))
}
