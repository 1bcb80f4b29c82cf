// services/supabase.rs
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

use crate::errors::{AppError, Result};

/// Rows per upsert request.
pub const UPSERT_BATCH_SIZE: usize = 50;

/// Write-side collaborator: batched upserts against the Supabase PostgREST
/// surface. Merge-on-conflict keying makes repeated syncs idempotent
/// overwrites instead of duplicate inserts.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseStore {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        SupabaseStore {
            client,
            base_url: base_url.into(),
            service_key: service_key.into(),
        }
    }

    /// Upserts one batch (≤ UPSERT_BATCH_SIZE rows) into `table`, merging on
    /// the `on_conflict` column set.
    pub async fn upsert(&self, table: &str, on_conflict: &str, rows: &[Value]) -> Result<()> {
        let url = format!(
            "{}/rest/v1/{}?on_conflict={}",
            self.base_url, table, on_conflict
        );

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(rows)
            .send()
            .await
            .map_err(|e| AppError::storage(format!("upsert into {} failed: {}", table, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            error!("Upsert into {} returned {}: {}", table, status, snippet);
            return Err(AppError::storage(format!(
                "upsert into {} returned {}: {}",
                table, status, snippet
            )));
        }

        info!("Upserted {} rows into {}", rows.len(), table);
        Ok(())
    }
}
