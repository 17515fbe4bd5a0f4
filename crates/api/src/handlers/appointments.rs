//! Handlers for the `/appointments` resource.
//!
//! Every handler delegates to the shared [`SchedulingEngine`](agenda_scheduling::SchedulingEngine);
//! request parsing and validation errors surface through [`AppError`].

use agenda_core::types::DbId;
use agenda_db::models::appointment::{Appointment, AppointmentWithDetails};
use agenda_db::models::audit::AuditLog;
use agenda_scheduling::{
    CancelAppointmentRequest, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / query parameter types
// ---------------------------------------------------------------------------

/// Query parameters for the availability check.
#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub date: String,
    pub start_time: String,
    pub attended_by: DbId,
}

#[derive(Debug, Serialize)]
pub struct Availability {
    pub available: bool,
}

/// Query parameters for listing by date range (both inclusive).
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start_date: String,
    pub end_date: String,
}

/// Body for `PUT /appointments/{id}/cancel-by-client`.
#[derive(Debug, Deserialize)]
pub struct ClientCancellation {
    pub client_dni: String,
    pub reason: String,
}

/// Body for `PUT /appointments/{id}/cancel-by-employee`.
#[derive(Debug, Deserialize)]
pub struct EmployeeCancellation {
    pub employee_email: String,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /api/v1/appointments
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateAppointmentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Appointment>>)> {
    let appointment = state.engine.create(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: appointment })))
}

/// PUT /api/v1/appointments/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAppointmentRequest>,
) -> AppResult<Json<DataResponse<Appointment>>> {
    let appointment = state.engine.update(id, &input).await?;
    Ok(Json(DataResponse { data: appointment }))
}

/// PUT /api/v1/appointments/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CancelAppointmentRequest>,
) -> AppResult<Json<DataResponse<Appointment>>> {
    let appointment = state.engine.cancel(id, &input).await?;
    Ok(Json(DataResponse { data: appointment }))
}

/// PUT /api/v1/appointments/{id}/cancel-by-client
pub async fn cancel_by_client(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ClientCancellation>,
) -> AppResult<Json<DataResponse<Appointment>>> {
    let appointment = state
        .engine
        .cancel_by_client(id, &input.client_dni, &input.reason)
        .await?;
    Ok(Json(DataResponse { data: appointment }))
}

/// PUT /api/v1/appointments/{id}/cancel-by-employee
pub async fn cancel_by_employee(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<EmployeeCancellation>,
) -> AppResult<Json<DataResponse<Appointment>>> {
    let appointment = state
        .engine
        .cancel_by_employee(id, &input.employee_email, &input.reason)
        .await?;
    Ok(Json(DataResponse { data: appointment }))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/appointments/availability?date&start_time&attended_by
pub async fn availability(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityParams>,
) -> AppResult<Json<DataResponse<Availability>>> {
    let available = state
        .engine
        .check_availability(&params.date, &params.start_time, params.attended_by)
        .await?;
    Ok(Json(DataResponse {
        data: Availability { available },
    }))
}

/// GET /api/v1/appointments/date-range?start_date&end_date
pub async fn list_by_date_range(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<DataResponse<Vec<AppointmentWithDetails>>>> {
    let appointments = state
        .engine
        .list_by_date_range(&params.start_date, &params.end_date)
        .await?;
    Ok(Json(DataResponse { data: appointments }))
}

/// GET /api/v1/appointments/client/{client_id}
pub async fn list_by_client(
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AppointmentWithDetails>>>> {
    let appointments = state.engine.list_by_client(client_id).await?;
    Ok(Json(DataResponse { data: appointments }))
}

/// GET /api/v1/appointments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Appointment>>> {
    let appointment = state.engine.get(id).await?;
    Ok(Json(DataResponse { data: appointment }))
}

/// GET /api/v1/appointments/{id}/details
pub async fn get_details(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AppointmentWithDetails>>> {
    let appointment = state.engine.get_with_details(id).await?;
    Ok(Json(DataResponse { data: appointment }))
}

/// GET /api/v1/appointments/{id}/audit
pub async fn audit_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AuditLog>>>> {
    let entries = state.engine.audit_history(id).await?;
    Ok(Json(DataResponse { data: entries }))
}
