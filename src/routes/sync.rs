use axum::{routing::get, Router};

use crate::handlers::sync;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/sync", get(sync::run_sync))
}
