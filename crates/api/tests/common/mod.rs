//! Router and request helpers shared by the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use incidentdesk_api::config::{IdentityConfig, ServerConfig};
use incidentdesk_api::router::build_app_router;
use incidentdesk_api::state::AppState;
use incidentdesk_db::PoolConfig;
use incidentdesk_identity::InMemoryIdentityProvider;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as the only CORS origin and a 30-second
/// request timeout. The identity settings are never dialled.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        db: PoolConfig::default(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        identity: IdentityConfig {
            url: "http://identity.invalid".to_string(),
            anon_key: "test-anon-key".to_string(),
            timeout: Duration::from_secs(1),
        },
    }
}

/// Build the full application router over `pool`, backed by a fresh
/// in-memory identity provider that the test can inspect and steer.
pub fn build_test_app(pool: PgPool) -> (Router, Arc<InMemoryIdentityProvider>) {
    let config = test_config();
    let provider = Arc::new(InMemoryIdentityProvider::new());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        identity: provider.clone(),
    };

    (build_app_router(state, &config), provider)
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: String) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
