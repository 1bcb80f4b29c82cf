use axum::{routing::get, Router};

use crate::handlers::competition;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/standings", get(competition::get_standings))
        .route("/rounds", get(competition::get_rounds))
}
