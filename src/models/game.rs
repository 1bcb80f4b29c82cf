use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upstream game lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Scheduled,
    Played,
    Live,
    Playing,
}

impl GameStatus {
    /// Loose parse of the upstream status string. Unknown values map to
    /// Scheduled.
    pub fn parse(raw: &str) -> GameStatus {
        match raw.to_lowercase().as_str() {
            "played" | "final" | "result" | "finished" => GameStatus::Played,
            "live" => GameStatus::Live,
            "playing" | "inprogress" | "in_progress" => GameStatus::Playing,
            _ => GameStatus::Scheduled,
        }
    }

    /// A boxscore fetch is meaningful once play has started or finished.
    pub fn is_eligible(&self) -> bool {
        matches!(
            self,
            GameStatus::Played | GameStatus::Live | GameStatus::Playing
        )
    }
}

/// One side of a game (local or road) flattened for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamLine {
    pub code: Option<String>,
    pub name: Option<String>,
    pub score: Option<i64>,
    pub q1: Option<i64>,
    pub q2: Option<i64>,
    pub q3: Option<i64>,
    pub q4: Option<i64>,
    /// Overtime partials as supplied upstream, empty object when none.
    pub overtimes: Value,
}

/// Persistence row for one game, upserted on (season_code, game_code).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRow {
    pub season_code: String,
    pub game_code: i64,
    pub competition: String,
    pub status: GameStatus,
    pub played: bool,

    pub local_team_code: Option<String>,
    pub local_team_name: Option<String>,
    pub local_score: Option<i64>,
    pub local_q1: Option<i64>,
    pub local_q2: Option<i64>,
    pub local_q3: Option<i64>,
    pub local_q4: Option<i64>,
    pub local_overtimes: Value,

    pub road_team_code: Option<String>,
    pub road_team_name: Option<String>,
    pub road_score: Option<i64>,
    pub road_q1: Option<i64>,
    pub road_q2: Option<i64>,
    pub road_q3: Option<i64>,
    pub road_q4: Option<i64>,
    pub road_overtimes: Value,

    /// Audit copy of the upstream record, stored as-is.
    pub raw_data: Value,
}
