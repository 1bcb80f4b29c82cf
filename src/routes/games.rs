use axum::{routing::get, Router};

use crate::handlers::games;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(games::get_games))
        .route("/game", get(games::get_game))
        .route("/boxscore", get(games::get_boxscore))
        .route("/pbp", get(games::get_playbyplay))
}
