// config.rs
use std::env;

const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api-live.euroleague.net/v3";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub upstream_base_url: String,
    pub supabase_url: Option<String>,
    pub supabase_service_key: Option<String>,
    pub port: u16,
    pub host: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        AppConfig {
            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE_URL.to_string()),
            supabase_url: env::var("SUPABASE_URL").ok().filter(|v| !v.is_empty()),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .ok()
                .filter(|v| !v.is_empty()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .unwrap_or(10000),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
        }
    }

    pub fn store_configured(&self) -> bool {
        self.supabase_url.is_some() && self.supabase_service_key.is_some()
    }
}
