//! Inbound request shapes.
//!
//! Dates and times arrive as raw strings and are validated by the engine so
//! that every failure can name the offending field.

use agenda_core::types::DbId;
use serde::Deserialize;

/// Book a new appointment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointmentRequest {
    pub client_id: DbId,
    pub service_id: DbId,
    /// `YYYY-MM-DD`.
    pub appointment_date: String,
    /// `HH:MM`, 24h.
    pub start_time: String,
    #[serde(default)]
    pub attended_by: Option<DbId>,
}

/// Partial update. Each field is independently present or absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub appointment_date: Option<String>,
    pub start_time: Option<String>,
    pub attended_by: Option<DbId>,
    pub status: Option<String>,
}

impl UpdateAppointmentRequest {
    /// Whether the date, start time or attendant is being changed.
    pub fn changes_slot(&self) -> bool {
        self.appointment_date.is_some() || self.start_time.is_some() || self.attended_by.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.changes_slot() && self.status.is_none()
    }
}

/// Cancel an appointment on behalf of a client or an employee.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelAppointmentRequest {
    /// Identifier of the cancelling party (client DNI, employee email, ...).
    pub cancelled_by: String,
    /// `client` or `employee`.
    pub cancelled_by_type: String,
    pub reason: String,
}
