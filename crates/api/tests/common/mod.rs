#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use agenda_api::config::ServerConfig;
use agenda_api::router::build_app_router;
use agenda_api::state::AppState;
use agenda_core::types::DbId;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. Same construction as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

/// Reference rows an appointment needs.
pub struct Seed {
    pub client_id: DbId,
    pub service_id: DbId,
    pub employee_id: DbId,
}

pub async fn seed(pool: &PgPool) -> Seed {
    let client_id: DbId = sqlx::query_scalar(
        "INSERT INTO clients (first_name, last_name, dni) VALUES ('Ana', 'Torres', '12345678') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    let service_id: DbId = sqlx::query_scalar(
        "INSERT INTO services (name, price, duration_minutes) VALUES ('Haircut', 35.50, 60) RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    let employee_id: DbId = sqlx::query_scalar(
        "INSERT INTO employees (name, paternal_surname, email) VALUES ('Luis', 'Rojas', 'luis@salon.pe') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();

    Seed {
        client_id,
        service_id,
        employee_id,
    }
}
