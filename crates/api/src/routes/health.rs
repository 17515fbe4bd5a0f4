use axum::extract::State;
use axum::{routing::get, Json, Router};
use chrono::NaiveDate;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}

/// Payload of `GET /health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database cannot be reached.
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// Bookings for dates before this day are rejected.
    pub booking_day: NaiveDate,
    pub db_healthy: bool,
    pub pool: PoolStats,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = agenda_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        booking_day: state.engine.today(),
        db_healthy,
        pool: PoolStats {
            size: state.pool.size(),
            idle: state.pool.num_idle(),
        },
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
