// services/upstream.rs
use reqwest::{header, Client};
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

use crate::errors::{AppError, Result};

const BODY_SNIPPET_LEN: usize = 200;

/// Read-only client for the upstream feeds API. One primitive: GET a path
/// under the fixed base URL, parse JSON, fail on non-2xx.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        UpstreamClient {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        info!("Upstream GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("request to {} failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(BODY_SNIPPET_LEN).collect();
            error!("Upstream {} returned {}: {}", path, status, snippet);
            return Err(AppError::upstream(format!(
                "{} returned {}: {}",
                path, status, snippet
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("invalid JSON from {}: {}", path, e)))
    }

    // Path builders for the feeds API surface.

    pub fn games_path(&self, competition: &str, season_code: &str) -> String {
        format!(
            "/competitions/{}/seasons/{}/games",
            competition, season_code
        )
    }

    pub fn game_path(&self, competition: &str, season_code: &str, game_number: &str) -> String {
        format!(
            "/competitions/{}/seasons/{}/games/{}",
            competition, season_code, game_number
        )
    }

    pub fn boxscore_path(&self, competition: &str, season_code: &str, game_number: &str) -> String {
        format!(
            "/competitions/{}/seasons/{}/games/{}/boxscore",
            competition, season_code, game_number
        )
    }

    pub fn playbyplay_path(
        &self,
        competition: &str,
        season_code: &str,
        game_number: &str,
    ) -> String {
        format!(
            "/competitions/{}/seasons/{}/games/{}/playbyplay",
            competition, season_code, game_number
        )
    }

    pub fn standings_path(&self, competition: &str, season_code: &str) -> String {
        format!(
            "/competitions/{}/seasons/{}/standings",
            competition, season_code
        )
    }

    pub fn rounds_path(
        &self,
        competition: &str,
        season_code: &str,
        round: Option<&str>,
    ) -> String {
        match round {
            Some(round) => format!(
                "/competitions/{}/seasons/{}/rounds/{}",
                competition, season_code, round
            ),
            None => format!(
                "/competitions/{}/seasons/{}/rounds",
                competition, season_code
            ),
        }
    }

    pub fn person_path(&self, person_code: &str) -> String {
        format!("/persons/{}", person_code)
    }

    pub fn person_stats_path(&self, season_code: &str, person_code: &str) -> String {
        format!("/seasons/{}/people/{}/stats", season_code, person_code)
    }
}
