use std::sync::Arc;

use crate::cache::ApiCache;
use crate::config::AppConfig;
use crate::services::supabase::SupabaseStore;
use crate::services::upstream::UpstreamClient;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// Shared across every request routed to this process; lives as long as
    /// the process, nothing is persisted.
    pub cache: Arc<ApiCache>,
    pub upstream: Arc<UpstreamClient>,
    pub store: Option<Arc<SupabaseStore>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let upstream = Arc::new(UpstreamClient::new(config.upstream_base_url.clone()));
        AppState {
            config,
            cache: Arc::new(ApiCache::new()),
            upstream,
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<SupabaseStore>) -> Self {
        self.store = Some(store);
        self
    }
}
