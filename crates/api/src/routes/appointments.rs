//! Route definitions for the `/appointments` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::appointments;
use crate::state::AppState;

/// Routes mounted at `/appointments`.
///
/// ```text
/// POST   /                              -> create
/// GET    /availability                  -> availability
/// GET    /date-range                    -> list_by_date_range
/// GET    /client/{client_id}            -> list_by_client
/// GET    /{id}                          -> get_by_id
/// PUT    /{id}                          -> update
/// GET    /{id}/details                  -> get_details
/// PUT    /{id}/cancel                   -> cancel
/// PUT    /{id}/cancel-by-client         -> cancel_by_client
/// PUT    /{id}/cancel-by-employee       -> cancel_by_employee
/// GET    /{id}/audit                    -> audit_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(appointments::create))
        .route("/availability", get(appointments::availability))
        .route("/date-range", get(appointments::list_by_date_range))
        .route("/client/{client_id}", get(appointments::list_by_client))
        .route(
            "/{id}",
            get(appointments::get_by_id).put(appointments::update),
        )
        .route("/{id}/details", get(appointments::get_details))
        .route("/{id}/cancel", put(appointments::cancel))
        .route("/{id}/cancel-by-client", put(appointments::cancel_by_client))
        .route(
            "/{id}/cancel-by-employee",
            put(appointments::cancel_by_employee),
        )
        .route("/{id}/audit", get(appointments::audit_history))
}
