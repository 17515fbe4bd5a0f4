//! Appointment lifecycle vocabulary and the status validator.
//!
//! Statuses are stored as lowercase text (`pending`, `confirmed`, `cancelled`,
//! `completed`). `cancelled` is terminal. Among the other three, any target is
//! accepted: no ordering between `pending`, `confirmed` and `completed` is
//! enforced.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// AppointmentStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Cancelled,
        Self::Completed,
    ];

    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// No transition leaves a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == raw)
            .ok_or_else(|| CoreError::validation("status", format!("invalid status: {raw}")))
    }
}

/// Check that `current` may be moved to `target`.
///
/// Only leaving `cancelled` is refused (as a conflict, since the request is
/// well-formed but the record no longer accepts writes).
pub fn validate_status_change(
    current: AppointmentStatus,
    target: AppointmentStatus,
) -> Result<(), CoreError> {
    if current.is_terminal() {
        return Err(CoreError::Conflict(format!(
            "appointment is {current}; cannot change status to {target}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CancelledByType
// ---------------------------------------------------------------------------

/// The kind of party that cancelled an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelledByType {
    Client,
    Employee,
}

impl CancelledByType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Employee => "employee",
        }
    }
}

impl fmt::Display for CancelledByType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CancelledByType {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "client" => Ok(Self::Client),
            "employee" => Ok(Self::Employee),
            other => Err(CoreError::validation(
                "cancelled_by_type",
                format!("invalid cancelled_by_type: {other}"),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
