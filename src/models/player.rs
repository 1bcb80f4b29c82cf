use serde::{Deserialize, Serialize};

/// One stat line per (game, person), upserted on
/// (season_code, game_code, person_code). Rows exist only for player-typed
/// entries that carry a person code — coaches and malformed entries are
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub season_code: String,
    pub game_code: i64,
    pub person_code: String,

    pub person_name: Option<String>,
    pub alias: Option<String>,
    pub dorsal: Option<String>,
    pub position: Option<String>,
    pub team_code: Option<String>,
    pub is_home: bool,
    pub is_starter: bool,

    /// Display form ("MM:SS") and the agreeing decimal form.
    pub minutes: String,
    pub minutes_decimal: f64,

    pub fg2_made: i64,
    pub fg2_attempted: i64,
    pub fg3_made: i64,
    pub fg3_attempted: i64,
    // Combined field goals are always derived: 2pt + 3pt.
    pub fg_made: i64,
    pub fg_attempted: i64,
    pub ft_made: i64,
    pub ft_attempted: i64,

    pub offensive_rebounds: i64,
    pub defensive_rebounds: i64,
    pub total_rebounds: i64,

    pub assists: i64,
    pub turnovers: i64,
    pub steals: i64,
    pub blocks_favour: i64,
    pub blocks_against: i64,
    pub fouls_committed: i64,
    pub fouls_received: i64,

    /// PIR / valuation efficiency rating.
    pub pir: i64,
    pub plus_minus: i64,
}
