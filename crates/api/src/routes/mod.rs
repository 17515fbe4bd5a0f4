pub mod appointments;
pub mod audit;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /appointments                              create
/// /appointments/availability                 slot availability (GET)
/// /appointments/date-range                   list by date range (GET)
/// /appointments/client/{client_id}           list by client (GET)
/// /appointments/{id}                         get, update
/// /appointments/{id}/details                 get with client/service details
/// /appointments/{id}/cancel                  cancel (PUT)
/// /appointments/{id}/cancel-by-client        cancel as client (PUT)
/// /appointments/{id}/cancel-by-employee      cancel as employee (PUT)
/// /appointments/{id}/audit                   audit history (GET)
///
/// /audit-logs                                audit entries by table and day range (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/appointments", appointments::router())
        .nest("/audit-logs", audit::router())
}
