use axum::{routing::get, Router};

use crate::handlers::players;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/player", get(players::get_player))
}
