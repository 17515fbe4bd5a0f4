//! Handlers for audit log queries.

use agenda_core::audit::tables;
use agenda_db::models::audit::AuditLog;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /audit-logs`.
#[derive(Debug, Deserialize)]
pub struct AuditLogQueryParams {
    /// Audited table (default: `appointments`).
    pub table: Option<String>,
    /// First calendar day, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Last calendar day (inclusive), `YYYY-MM-DD`.
    pub to: Option<String>,
}

/// GET /api/v1/audit-logs?table&from&to
///
/// Entries created on any day in `[from, to]`, newest first.
pub async fn list_by_date_range(
    State(state): State<AppState>,
    Query(params): Query<AuditLogQueryParams>,
) -> AppResult<Json<DataResponse<Vec<AuditLog>>>> {
    let (Some(from), Some(to)) = (params.from.as_deref(), params.to.as_deref()) else {
        return Err(AppError::BadRequest(
            "Both `from` and `to` query parameters are required".into(),
        ));
    };
    let table = params.table.as_deref().unwrap_or(tables::APPOINTMENTS);

    let entries = state.engine.audit_by_date_range(table, from, to).await?;
    Ok(Json(DataResponse { data: entries }))
}
