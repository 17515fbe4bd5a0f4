use std::sync::Arc;

use agenda_db::DbPool;
use agenda_scheduling::{PgAppointmentStore, PgAuditRecorder, SchedulingEngine};

use crate::config::ServerConfig;

/// The engine as wired in production: Postgres store, Postgres audit trail,
/// system clock.
pub type Engine = SchedulingEngine<PgAppointmentStore, PgAuditRecorder>;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Scheduling engine shared by every request.
    pub engine: Arc<Engine>,
}

impl AppState {
    pub fn new(pool: DbPool, config: ServerConfig) -> Self {
        let engine = SchedulingEngine::new(
            PgAppointmentStore::new(pool.clone()),
            PgAuditRecorder::new(pool.clone()),
        );
        Self {
            pool,
            config: Arc::new(config),
            engine: Arc::new(engine),
        }
    }
}
