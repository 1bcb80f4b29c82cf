pub(crate) mod competition;
pub(crate) mod diagnostics;
pub(crate) mod games;
pub(crate) mod players;
pub(crate) mod sync;

use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};

use crate::season::{default_season_year, resolve_season_code, DEFAULT_COMPETITION};

pub(crate) const META_SOURCE: &str = "euroleague-api";

/// Resolves the (competition code, season code) pair every read endpoint
/// accepts: `code` defaults to the flagship competition, `season` to the
/// current year, and an explicit `seasonCode` override wins.
pub(crate) fn resolve_params(
    code: Option<&str>,
    season: Option<&str>,
    season_code: Option<&str>,
) -> (String, String) {
    let code = code.unwrap_or(DEFAULT_COMPETITION).to_string();
    let year = season
        .map(str::to_string)
        .unwrap_or_else(default_season_year);
    let resolved = resolve_season_code(&code, &year, season_code);
    (code, resolved)
}

/// Attaches retrieval metadata to a successful upstream payload. Objects get
/// a `_meta` key merged in; arrays and scalars cannot carry one, so they are
/// wrapped as `{data, _meta}`.
pub(crate) fn wrap_payload(payload: Value, params: Value) -> Value {
    let meta = json!({
        "source": META_SOURCE,
        "fetched_at": chrono::Utc::now().to_rfc3339(),
        "params": params,
    });
    match payload {
        Value::Object(mut map) => {
            map.insert("_meta".to_string(), meta);
            Value::Object(map)
        }
        other => json!({ "data": other, "_meta": meta }),
    }
}

/// JSON response carrying the cache outcome in an `X-Cache` header.
pub(crate) fn cached_response(value: Value, hit: bool) -> Response {
    let outcome = if hit { "HIT" } else { "MISS" };
    ([("x-cache", outcome)], Json(value)).into_response()
}
