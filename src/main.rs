use axum::extract::State;
use axum::{http::Method, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod cache;
mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod season;
mod services;
mod state;

use config::AppConfig;
use services::supabase::SupabaseStore;
use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = AppConfig::from_env();
    let host = config.host.clone();
    let port = config.port;
    let app_state = initialize_app_state(config);

    let app = build_router(app_state);
    start_server(app, &host, port).await;
}

fn initialize_app_state(config: AppConfig) -> AppState {
    tracing::info!("🌐 Upstream base URL: {}", config.upstream_base_url);

    let mut app_state = AppState::new(config.clone());

    match (&config.supabase_url, &config.supabase_service_key) {
        (Some(url), Some(key)) => {
            tracing::info!("✅ Supabase store configured at {}", url);
            app_state =
                app_state.with_store(Arc::new(SupabaseStore::new(url.clone(), key.clone())));
        }
        _ => {
            tracing::warn!(
                "⚠️ SUPABASE_URL / SUPABASE_SERVICE_KEY not set - sync endpoint disabled"
            );
        }
    }

    app_state
}

fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .nest("/api", routes::games::routes())
        .nest("/api", routes::competition::routes())
        .nest("/api", routes::players::routes())
        .nest("/api", routes::sync::routes())
        .nest("/api", routes::diagnostics::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

async fn start_server(app: Router, host: &str, port: u16) {
    let addr = format!("{}:{}", host, port);

    tracing::info!("🚀 Server starting on {}", addr);

    match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Server error: {}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    }
}

async fn root_handler() -> &'static str {
    "🏀 Courtside EuroLeague API Proxy"
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "upstream": state.upstream.base_url(),
        "store": state.config.store_configured(),
        "cache_entries": state.cache.stats().entries,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state(upstream_url: &str) -> AppState {
        AppState::new(AppConfig {
            upstream_base_url: upstream_url.to_string(),
            supabase_url: None,
            supabase_service_key: None,
            port: 0,
            host: "127.0.0.1".to_string(),
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn game_without_game_number_is_rejected_naming_the_parameter() {
        let app = build_router(test_state("http://127.0.0.1:1"));

        let response = app
            .oneshot(Request::get("/api/game").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("gameNumber"));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn games_endpoint_caches_and_surfaces_hit_miss() {
        let mut server = mockito::Server::new_async().await;
        let upstream = server
            .mock("GET", "/competitions/E/seasons/E2025/games")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":[{"gameCode":1}]}"#)
            .expect(1)
            .create_async()
            .await;

        let app = build_router(test_state(&server.url()));

        let first = app
            .clone()
            .oneshot(
                Request::get("/api/games?seasonCode=E2025")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(
            first.headers().get("x-cache").unwrap().to_str().unwrap(),
            "MISS"
        );
        let body = body_json(first).await;
        assert_eq!(body["_meta"]["source"], "euroleague-api");
        assert_eq!(body["_meta"]["params"]["seasonCode"], "E2025");
        assert_eq!(body["data"][0]["gameCode"], 1);

        // Second request is served from the cache; the upstream mock only
        // allows one hit.
        let second = app
            .oneshot(
                Request::get("/api/games?seasonCode=E2025")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            second.headers().get("x-cache").unwrap().to_str().unwrap(),
            "HIT"
        );

        upstream.assert_async().await;
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_bad_gateway() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/competitions/E/seasons/E2025/games")
            .with_status(503)
            .with_body("feed down")
            .create_async()
            .await;

        let app = build_router(test_state(&server.url()));
        let response = app
            .oneshot(
                Request::get("/api/games?seasonCode=E2025")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("503"));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn sync_without_store_credential_is_a_configuration_error() {
        let app = build_router(test_state("http://127.0.0.1:1"));

        let response = app
            .oneshot(Request::get("/api/sync").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("SUPABASE_SERVICE_KEY"));
        assert!(body.get("success").is_none());
    }

    #[tokio::test]
    async fn health_reports_component_readiness() {
        let app = build_router(test_state("http://upstream.example"));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["store"], false);
        assert_eq!(body["cache_entries"], 0);
    }

    #[tokio::test]
    async fn cache_diagnostics_lists_keys() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/competitions/E/seasons/E2025/standings")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"standings":[]}"#)
            .create_async()
            .await;

        let app = build_router(test_state(&server.url()));
        app.clone()
            .oneshot(
                Request::get("/api/standings?seasonCode=E2025")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let response = app
            .oneshot(Request::get("/api/cache").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["entries"], 1);
        assert_eq!(body["keys"][0], "standings:E:E2025");
    }
}
