/// Common test utilities for router-level tests
///
/// Builds the full application router against a lazily-connected pool, so
/// the auth gate, request validation, and response shaping can be exercised
/// without a running database — none of the paths under test reach a query.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use evently_api::app::{build_router, AppState};
use evently_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use evently_shared::auth::jwt::{create_token, Claims};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

/// Signing secret shared by the test app and the tokens minted below
pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Email baked into valid test tokens
pub const TEST_EMAIL: &str = "tester@example.com";

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            // Never connected: the pool is created lazily and the tested
            // paths fail or finish before any query runs.
            url: "postgresql://localhost:1/evently_test".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
    }
}

/// Builds the application router backed by a lazy pool
pub fn test_app() -> Router {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_lazy(&config.database.url)
        .expect("lazy pool creation should not fail");

    build_router(AppState::new(pool, config))
}

/// Mints a valid bearer token for the test identity
pub fn valid_token() -> String {
    let claims = Claims::new(Uuid::new_v4(), TEST_EMAIL);
    create_token(&claims, TEST_SECRET).expect("token creation should succeed")
}

/// Sends one request through the router and returns status + parsed body
///
/// An empty response body parses as JSON `null`.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}
