//! Audit trail vocabulary and helpers.
//!
//! Audit entries are append-only. This module only names things and computes
//! query bounds; persistence lives in the `db` crate.

use chrono::{Days, NaiveDate};

use crate::error::CoreError;
use crate::status::CancelledByType;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Action constants
// ---------------------------------------------------------------------------

/// Known action kinds for audit log entries (matches the `audit_logs.action` CHECK).
pub mod actions {
    pub const CREATE: &str = "CREATE";
    pub const UPDATE: &str = "UPDATE";
    pub const DELETE: &str = "DELETE";
    pub const CANCEL: &str = "CANCEL";
}

// ---------------------------------------------------------------------------
// Actor type constants
// ---------------------------------------------------------------------------

/// Known actor roles (matches the `audit_logs.changed_by_type` CHECK).
pub mod actor_types {
    pub const CLIENT: &str = "client";
    pub const EMPLOYEE: &str = "employee";
    pub const SYSTEM: &str = "system";
}

/// Audited table names.
pub mod tables {
    pub const APPOINTMENTS: &str = "appointments";
}

/// Map the cancelling party's role onto the audit actor role.
pub fn actor_type_for(cancelled_by: CancelledByType) -> &'static str {
    match cancelled_by {
        CancelledByType::Client => actor_types::CLIENT,
        CancelledByType::Employee => actor_types::EMPLOYEE,
    }
}

// ---------------------------------------------------------------------------
// Date range bounds
// ---------------------------------------------------------------------------

/// Convert an inclusive calendar-day range into a half-open UTC interval
/// `[from 00:00, to + 1 day 00:00)` over `created_at`.
pub fn day_range_bounds(from: NaiveDate, to: NaiveDate) -> Result<(Timestamp, Timestamp), CoreError> {
    if from > to {
        return Err(CoreError::validation(
            "from",
            "start date cannot be after end date",
        ));
    }
    let end = to
        .checked_add_days(Days::new(1))
        .ok_or_else(|| CoreError::validation("to", "date out of range"))?;

    Ok((
        from.and_time(chrono::NaiveTime::MIN).and_utc(),
        end.and_time(chrono::NaiveTime::MIN).and_utc(),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
