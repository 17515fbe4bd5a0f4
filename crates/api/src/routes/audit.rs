//! Route definitions for `/audit-logs`.

use axum::routing::get;
use axum::Router;

use crate::handlers::audit;
use crate::state::AppState;

/// Routes mounted at `/audit-logs`.
///
/// ```text
/// GET    /?table&from&to                -> list_by_date_range
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(audit::list_by_date_range))
}
