// src/season.rs
use chrono::{Datelike, Utc};

pub const DEFAULT_COMPETITION: &str = "E";

/// Resolves the upstream composite season identifier, e.g. "E2025".
///
/// An explicit non-empty override wins verbatim regardless of the code and
/// year arguments; otherwise the identifier is the uppercased competition
/// code concatenated with the season year. No validation of the year format
/// or the competition code — unknown codes pass through to the upstream.
pub fn resolve_season_code(code: &str, year: &str, override_code: Option<&str>) -> String {
    if let Some(explicit) = override_code {
        let explicit = explicit.trim();
        if !explicit.is_empty() {
            return explicit.to_string();
        }
    }
    format!("{}{}", code.to_uppercase(), year)
}

/// Default season year when the caller supplies neither `season` nor
/// `seasonCode`: the current UTC calendar year.
pub fn default_season_year() -> String {
    Utc::now().year().to_string()
}
