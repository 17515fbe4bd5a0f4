//! Appointment entity model and DTOs.

use agenda_core::error::CoreError;
use agenda_core::scheduling::serialize_hhmm;
use agenda_core::status::AppointmentStatus;
use agenda_core::types::{DbId, Timestamp};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::FromRow;

/// An appointment row from the `appointments` table.
///
/// Rows are never deleted; cancellation is a terminal status.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Appointment {
    pub id: DbId,
    pub client_id: DbId,
    pub service_id: DbId,
    pub appointment_date: NaiveDate,
    #[serde(serialize_with = "serialize_hhmm")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "serialize_hhmm")]
    pub end_time: NaiveTime,
    pub attended_by: Option<DbId>,
    pub status: String,
    pub cancelled_by: Option<String>,
    pub cancelled_by_type: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Appointment {
    /// Parse the stored status text.
    pub fn status(&self) -> Result<AppointmentStatus, CoreError> {
        self.status.parse()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == AppointmentStatus::Cancelled.as_str()
    }
}

/// An appointment joined with its client and service.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AppointmentWithDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub appointment: Appointment,
    pub client_name: String,
    pub client_dni: String,
    pub service_name: String,
    pub service_price: f64,
    pub service_duration: i32,
}

/// DTO for inserting a new appointment. All slot fields are already validated.
#[derive(Debug, Clone)]
pub struct CreateAppointment {
    pub client_id: DbId,
    pub service_id: DbId,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub attended_by: Option<DbId>,
    pub status: String,
}

/// DTO for a partial update. Only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateAppointment {
    pub appointment_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub attended_by: Option<DbId>,
    pub status: Option<String>,
}

/// DTO for the cancellation write.
#[derive(Debug, Clone)]
pub struct CancelAppointment {
    pub cancelled_by: String,
    pub cancelled_by_type: String,
    pub cancellation_reason: String,
}

/// Availability probe for one slot.
#[derive(Debug, Clone, Copy)]
pub struct SlotQuery {
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub attended_by: DbId,
    /// Ignore this appointment when scanning (for in-place updates).
    pub exclude_id: Option<DbId>,
}
