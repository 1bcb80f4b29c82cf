// services/transform.rs
//
// Flattening of upstream game and boxscore payloads into persistence rows.
// Upstream fields are accessed through ordered-fallback resolvers: each
// field group documents the key order it tries, and the first non-null hit
// wins. Two boxscore player shapes exist in the wild —
// `{player: {...}, stats: {...}}` and one flat object — and both are
// normalized into a single (identity, stats) view before the numeric
// reconciliation rules run.

use serde_json::{json, Value};

use crate::models::game::{GameRow, GameStatus, TeamLine};
use crate::models::player::PlayerStatLine;

/// Key order for a game's identifying number.
pub const GAME_CODE_KEYS: &[&str] = &["gameCode", "code", "game"];

const STATUS_KEYS: &[&str] = &["status", "gameState"];

static NULL_VALUE: Value = Value::Null;

// ---------------------------------------------------------------------------
// Ordered-fallback field access
// ---------------------------------------------------------------------------

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

/// First non-null value among `keys`. A key may be a dotted path
/// ("person.code").
pub fn pick<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| lookup(value, key))
        .find(|v| !v.is_null())
}

pub fn pick_str(value: &Value, keys: &[&str]) -> Option<String> {
    match pick(value, keys)? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn pick_i64(value: &Value, keys: &[&str]) -> Option<i64> {
    match pick(value, keys)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub fn pick_bool(value: &Value, keys: &[&str]) -> Option<bool> {
    match pick(value, keys)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Playing time
// ---------------------------------------------------------------------------

/// Parses playing time into agreeing display ("MM:SS") and decimal forms.
/// Accepts either the "MM:SS" string shape or plain decimal minutes
/// (number or numeric string); decimal = MM + SS/60 in every case.
pub fn parse_minutes(raw: Option<&Value>) -> (String, f64) {
    match raw {
        Some(Value::String(s)) => {
            let s = s.trim();
            if let Some((minutes, seconds)) = s.split_once(':') {
                let minutes = minutes.trim().parse::<i64>().unwrap_or(0);
                let seconds = seconds.trim().parse::<i64>().unwrap_or(0);
                (
                    format!("{}:{:02}", minutes, seconds),
                    minutes as f64 + seconds as f64 / 60.0,
                )
            } else if let Ok(decimal) = s.parse::<f64>() {
                (format_minutes(decimal), decimal)
            } else {
                ("0:00".to_string(), 0.0)
            }
        }
        Some(Value::Number(n)) => {
            let decimal = n.as_f64().unwrap_or(0.0);
            (format_minutes(decimal), decimal)
        }
        _ => ("0:00".to_string(), 0.0),
    }
}

fn format_minutes(decimal: f64) -> String {
    let total_seconds = (decimal * 60.0).round() as i64;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

// ---------------------------------------------------------------------------
// Stat field groups
// ---------------------------------------------------------------------------

/// Shooting splits. Fallback order per field:
///   2pt made:      fieldGoalsMade2 → points2Made → twoPointersMade
///   2pt attempted: fieldGoalsAttempted2 → points2Attempted → twoPointersAttempted
///   3pt made:      fieldGoalsMade3 → points3Made → threePointersMade
///   3pt attempted: fieldGoalsAttempted3 → points3Attempted → threePointersAttempted
///   FT made:       freeThrowsMade → ftMade
///   FT attempted:  freeThrowsAttempted → ftAttempted
/// Combined field goals are never read upstream — always 2pt + 3pt.
#[derive(Debug, Default, Clone, Copy)]
pub struct Shooting {
    pub fg2_made: i64,
    pub fg2_attempted: i64,
    pub fg3_made: i64,
    pub fg3_attempted: i64,
    pub ft_made: i64,
    pub ft_attempted: i64,
}

pub fn shooting(stats: &Value) -> Shooting {
    Shooting {
        fg2_made: pick_i64(stats, &["fieldGoalsMade2", "points2Made", "twoPointersMade"])
            .unwrap_or(0),
        fg2_attempted: pick_i64(
            stats,
            &[
                "fieldGoalsAttempted2",
                "points2Attempted",
                "twoPointersAttempted",
            ],
        )
        .unwrap_or(0),
        fg3_made: pick_i64(stats, &["fieldGoalsMade3", "points3Made", "threePointersMade"])
            .unwrap_or(0),
        fg3_attempted: pick_i64(
            stats,
            &[
                "fieldGoalsAttempted3",
                "points3Attempted",
                "threePointersAttempted",
            ],
        )
        .unwrap_or(0),
        ft_made: pick_i64(stats, &["freeThrowsMade", "ftMade"]).unwrap_or(0),
        ft_attempted: pick_i64(stats, &["freeThrowsAttempted", "ftAttempted"]).unwrap_or(0),
    }
}

/// Rebounds. Fallback order:
///   offensive: offensiveRebounds → reboundsOffensive
///   defensive: defensiveRebounds → reboundsDefensive
///   total:     totalRebounds → rebounds → offensive + defensive
/// An explicit upstream total wins over the derived sum.
pub fn rebounds(stats: &Value) -> (i64, i64, i64) {
    let offensive = pick_i64(stats, &["offensiveRebounds", "reboundsOffensive"]).unwrap_or(0);
    let defensive = pick_i64(stats, &["defensiveRebounds", "reboundsDefensive"]).unwrap_or(0);
    let total =
        pick_i64(stats, &["totalRebounds", "rebounds"]).unwrap_or(offensive + defensive);
    (offensive, defensive, total)
}

// ---------------------------------------------------------------------------
// Game flattening
// ---------------------------------------------------------------------------

/// True when a boxscore fetch is meaningful for this raw game record.
pub fn is_eligible(game: &Value) -> bool {
    let status = GameStatus::parse(&pick_str(game, STATUS_KEYS).unwrap_or_default());
    status.is_eligible() || pick_bool(game, &["played"]).unwrap_or(false)
}

/// Flattens one raw upstream game into its persistence row. Returns None
/// when the record carries no game code — there is nothing to merge on.
pub fn game_row(game: &Value, competition: &str, fallback_season_code: &str) -> Option<GameRow> {
    let game_code = pick_i64(game, GAME_CODE_KEYS)?;
    let season_code = pick_str(game, &["seasonCode", "season.code"])
        .unwrap_or_else(|| fallback_season_code.to_string());
    let status = GameStatus::parse(&pick_str(game, STATUS_KEYS).unwrap_or_default());
    let played = pick_bool(game, &["played"]).unwrap_or(false) || status == GameStatus::Played;

    let local = team_line(pick(game, &["local", "home", "localTeam"]));
    let road = team_line(pick(game, &["road", "away", "roadTeam"]));

    Some(GameRow {
        season_code,
        game_code,
        competition: competition.to_string(),
        status,
        played,
        local_team_code: local.code,
        local_team_name: local.name,
        local_score: local.score,
        local_q1: local.q1,
        local_q2: local.q2,
        local_q3: local.q3,
        local_q4: local.q4,
        local_overtimes: local.overtimes,
        road_team_code: road.code,
        road_team_name: road.name,
        road_score: road.score,
        road_q1: road.q1,
        road_q2: road.q2,
        road_q3: road.q3,
        road_q4: road.q4,
        road_overtimes: road.overtimes,
        raw_data: game.clone(),
    })
}

/// One side of a game. Identity fallback: club → team → the side record
/// itself; quarter partials: partials object → the side record itself.
fn team_line(side: Option<&Value>) -> TeamLine {
    let side = side.unwrap_or(&NULL_VALUE);
    let club = pick(side, &["club", "team"]).unwrap_or(side);
    let partials = pick(side, &["partials"]).unwrap_or(side);

    TeamLine {
        code: pick_str(club, &["code", "tla", "abbreviation"]),
        name: pick_str(club, &["name", "clubName", "editorialName"]),
        score: pick_i64(side, &["score", "points"]),
        q1: pick_i64(partials, &["partial1", "q1", "quarter1"]),
        q2: pick_i64(partials, &["partial2", "q2", "quarter2"]),
        q3: pick_i64(partials, &["partial3", "q3", "quarter3"]),
        q4: pick_i64(partials, &["partial4", "q4", "quarter4"]),
        overtimes: pick(partials, &["extraPeriods", "overtimes"])
            .cloned()
            .unwrap_or_else(|| json!({})),
    }
}

// ---------------------------------------------------------------------------
// Boxscore flattening
// ---------------------------------------------------------------------------

/// Flattens a boxscore/stats payload into player stat lines for both sides.
/// Entries tagged as coaches and entries without a person code produce no
/// row.
pub fn player_rows(boxscore: &Value, season_code: &str, game_code: i64) -> Vec<PlayerStatLine> {
    let mut rows = Vec::new();

    let sides: [(&[&str], bool); 2] = [
        (&["local", "home", "localTeam"][..], true),
        (&["road", "away", "roadTeam"][..], false),
    ];

    for (side_keys, is_home) in sides {
        let Some(side) = pick(boxscore, side_keys) else {
            continue;
        };
        let team_code = pick(side, &["club", "team"])
            .and_then(|club| pick_str(club, &["code", "tla", "abbreviation"]))
            .or_else(|| pick_str(side, &["teamCode"]));

        let Some(players) = pick(side, &["players", "playersStats"]).and_then(Value::as_array)
        else {
            continue;
        };

        for entry in players {
            if let Some(row) =
                player_row(entry, season_code, game_code, team_code.clone(), is_home)
            {
                rows.push(row);
            }
        }
    }

    rows
}

/// Normalizes the two player-entry shapes into one (identity, stats) view:
/// nested entries carry `{player, stats}`, flat entries are both at once.
fn split_entry(entry: &Value) -> (&Value, &Value) {
    match entry.get("player") {
        Some(player) if player.is_object() => {
            let stats = match entry.get("stats") {
                Some(stats) if stats.is_object() => stats,
                _ => player,
            };
            (player, stats)
        }
        _ => (entry, entry),
    }
}

fn is_coach(entry: &Value) -> bool {
    if pick_bool(entry, &["isCoach", "coach", "player.isCoach"]).unwrap_or(false) {
        return true;
    }
    matches!(
        pick_str(entry, &["type", "player.type"]),
        Some(kind) if kind.eq_ignore_ascii_case("coach")
    )
}

/// Identity fallback order:
///   person code: code → personCode → person.code
///   name:        name → personName → person.name
///   alias:       alias → shortName
///   dorsal:      dorsal → number
///   position:    position → positionName
fn player_row(
    entry: &Value,
    season_code: &str,
    game_code: i64,
    team_code: Option<String>,
    is_home: bool,
) -> Option<PlayerStatLine> {
    if is_coach(entry) {
        return None;
    }

    let (identity, stats) = split_entry(entry);
    let person_code = pick_str(identity, &["code", "personCode", "person.code"])?;

    let (minutes, minutes_decimal) = parse_minutes(pick(stats, &["minutes", "timePlayed"]));
    let shooting = shooting(stats);
    let (offensive_rebounds, defensive_rebounds, total_rebounds) = rebounds(stats);

    Some(PlayerStatLine {
        season_code: season_code.to_string(),
        game_code,
        person_code,
        person_name: pick_str(identity, &["name", "personName", "person.name"]),
        alias: pick_str(identity, &["alias", "shortName"]),
        dorsal: pick_str(identity, &["dorsal", "number"]),
        position: pick_str(identity, &["position", "positionName"]),
        team_code,
        is_home,
        is_starter: pick_bool(entry, &["starter", "isStarter", "startFive"])
            .or_else(|| pick_bool(identity, &["starter", "isStarter", "startFive"]))
            .unwrap_or(false),
        minutes,
        minutes_decimal,
        fg2_made: shooting.fg2_made,
        fg2_attempted: shooting.fg2_attempted,
        fg3_made: shooting.fg3_made,
        fg3_attempted: shooting.fg3_attempted,
        fg_made: shooting.fg2_made + shooting.fg3_made,
        fg_attempted: shooting.fg2_attempted + shooting.fg3_attempted,
        ft_made: shooting.ft_made,
        ft_attempted: shooting.ft_attempted,
        offensive_rebounds,
        defensive_rebounds,
        total_rebounds,
        assists: pick_i64(stats, &["assistances", "assists"]).unwrap_or(0),
        turnovers: pick_i64(stats, &["turnovers"]).unwrap_or(0),
        steals: pick_i64(stats, &["steals"]).unwrap_or(0),
        blocks_favour: pick_i64(stats, &["blocksFavour", "blocks"]).unwrap_or(0),
        blocks_against: pick_i64(stats, &["blocksAgainst"]).unwrap_or(0),
        fouls_committed: pick_i64(stats, &["foulsCommited", "foulsCommitted"]).unwrap_or(0),
        fouls_received: pick_i64(stats, &["foulsReceived"]).unwrap_or(0),
        pir: pick_i64(stats, &["valuation", "pir"]).unwrap_or(0),
        plus_minus: pick_i64(stats, &["plusMinus", "plus_minus"]).unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minutes_parse_from_clock_string() {
        let raw = json!("25:30");
        let (display, decimal) = parse_minutes(Some(&raw));
        assert_eq!(display, "25:30");
        assert!((decimal - 25.5).abs() < 1e-9);
    }

    #[test]
    fn minutes_parse_from_decimal_number() {
        let raw = json!(25.5);
        let (display, decimal) = parse_minutes(Some(&raw));
        assert_eq!(display, "25:30");
        assert!((decimal - 25.5).abs() < 1e-9);
    }

    #[test]
    fn minutes_missing_is_zero() {
        let (display, decimal) = parse_minutes(None);
        assert_eq!(display, "0:00");
        assert_eq!(decimal, 0.0);
    }

    #[test]
    fn rebound_total_is_derived_unless_supplied() {
        let derived = json!({"offensiveRebounds": 3, "defensiveRebounds": 5});
        assert_eq!(rebounds(&derived), (3, 5, 8));

        let explicit = json!({"offensiveRebounds": 3, "defensiveRebounds": 5, "totalRebounds": 9});
        assert_eq!(rebounds(&explicit), (3, 5, 9));
    }

    #[test]
    fn combined_field_goals_are_always_the_sum() {
        let entry = json!({
            "code": "P001",
            "fieldGoalsMade2": 4,
            "fieldGoalsAttempted2": 7,
            "fieldGoalsMade3": 2,
            "fieldGoalsAttempted3": 6,
        });
        let row = player_row(&entry, "E2025", 1, None, true).unwrap();
        assert_eq!(row.fg_made, 6);
        assert_eq!(row.fg_attempted, 13);
    }

    #[test]
    fn nested_and_flat_player_shapes_produce_the_same_row() {
        let flat = json!({
            "code": "P003",
            "name": "Llull, Sergio",
            "dorsal": "23",
            "minutes": "18:45",
            "points3Made": 3,
            "points3Attempted": 5,
            "assistances": 4,
            "valuation": 15,
        });
        let nested = json!({
            "player": {"code": "P003", "name": "Llull, Sergio", "dorsal": "23"},
            "stats": {
                "minutes": "18:45",
                "points3Made": 3,
                "points3Attempted": 5,
                "assistances": 4,
                "valuation": 15,
            },
        });

        let a = player_row(&flat, "E2025", 3, Some("MAD".into()), false).unwrap();
        let b = player_row(&nested, "E2025", 3, Some("MAD".into()), false).unwrap();

        assert_eq!(a.person_code, b.person_code);
        assert_eq!(a.person_name, b.person_name);
        assert_eq!(a.minutes, b.minutes);
        assert_eq!(a.minutes_decimal, b.minutes_decimal);
        assert_eq!(a.fg3_made, b.fg3_made);
        assert_eq!(a.assists, b.assists);
        assert_eq!(a.pir, b.pir);
    }

    #[test]
    fn coaches_and_codeless_entries_produce_no_row() {
        let coach = json!({"code": "C001", "type": "coach", "name": "Coach"});
        assert!(player_row(&coach, "E2025", 1, None, true).is_none());

        let nested_coach = json!({"player": {"code": "C002", "type": "Coach"}});
        assert!(player_row(&nested_coach, "E2025", 1, None, true).is_none());

        let no_code = json!({"name": "Mystery Player", "minutes": "10:00"});
        assert!(player_row(&no_code, "E2025", 1, None, true).is_none());
    }

    #[test]
    fn boxscore_flattening_covers_both_sides() {
        let boxscore = json!({
            "local": {
                "club": {"code": "MAD"},
                "players": [
                    {"code": "P001", "minutes": "20:00"},
                    {"code": "P002", "minutes": "15:30"},
                ],
            },
            "road": {
                "club": {"code": "BAR"},
                "players": [{"code": "P010", "minutes": "31:12"}],
            },
        });
        let rows = player_rows(&boxscore, "E2025", 7);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_home && rows[1].is_home && !rows[2].is_home);
        assert_eq!(rows[0].team_code.as_deref(), Some("MAD"));
        assert_eq!(rows[2].team_code.as_deref(), Some("BAR"));
        assert_eq!(rows[2].season_code, "E2025");
        assert_eq!(rows[2].game_code, 7);
    }

    #[test]
    fn game_row_flattens_sides_and_keeps_an_audit_copy() {
        let game = json!({
            "gameCode": 12,
            "status": "result",
            "played": true,
            "local": {
                "club": {"code": "MAD", "name": "Real Madrid"},
                "score": 88,
                "partials": {"partial1": 20, "partial2": 25, "partial3": 18, "partial4": 25},
            },
            "road": {
                "club": {"code": "BAR", "name": "Barcelona"},
                "score": 80,
                "partials": {"partial1": 22, "partial2": 18, "partial3": 20, "partial4": 20},
            },
        });
        let row = game_row(&game, "E", "E2025").unwrap();
        assert_eq!(row.game_code, 12);
        assert_eq!(row.season_code, "E2025");
        assert_eq!(row.status, GameStatus::Played);
        assert!(row.played);
        assert_eq!(row.local_team_code.as_deref(), Some("MAD"));
        assert_eq!(row.local_q2, Some(25));
        assert_eq!(row.road_score, Some(80));
        assert_eq!(row.raw_data, game);
    }

    #[test]
    fn game_row_requires_a_game_code() {
        assert!(game_row(&json!({"status": "played"}), "E", "E2025").is_none());
    }

    #[test]
    fn eligibility_from_status_or_played_flag() {
        assert!(is_eligible(&json!({"status": "played"})));
        assert!(is_eligible(&json!({"status": "live"})));
        assert!(is_eligible(&json!({"status": "scheduled", "played": true})));
        assert!(!is_eligible(&json!({"status": "scheduled"})));
    }

    #[test]
    fn pick_walks_fallback_chains_and_dotted_paths() {
        let v = json!({"personCode": "X9", "person": {"code": "Y1"}, "empty": null});
        assert_eq!(pick_str(&v, &["code", "personCode", "person.code"]), Some("X9".into()));
        assert_eq!(pick_str(&v, &["code", "person.code"]), Some("Y1".into()));
        assert_eq!(pick_str(&v, &["empty", "personCode"]), Some("X9".into()));
        assert_eq!(pick_i64(&json!({"score": "88"}), &["score"]), Some(88));
    }
}
