//! The scheduling engine: create, update, cancel and availability queries.

use agenda_core::audit::{actions, actor_type_for, day_range_bounds, tables};
use agenda_core::error::CoreError;
use agenda_core::scheduling::{
    self, parse_bookable_date, parse_date, parse_start_time, Clock, SystemClock,
};
use agenda_core::status::{validate_status_change, AppointmentStatus, CancelledByType};
use agenda_core::types::DbId;
use agenda_db::models::appointment::{
    Appointment, AppointmentWithDetails, CancelAppointment, CreateAppointment, SlotQuery,
    UpdateAppointment,
};
use agenda_db::models::audit::AuditLog;
use chrono::NaiveDate;
use serde::Serialize;

use crate::audit::{AuditEntry, AuditRecorder};
use crate::error::{SchedulingResult, SLOT_UNAVAILABLE};
use crate::requests::{
    CancelAppointmentRequest, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::store::AppointmentStore;

const ALREADY_CANCELLED: &str = "appointment is already cancelled";

/// The fields written by a cancellation, recorded as the audit entry's new values.
#[derive(Debug, Serialize)]
struct CancellationSnapshot<'a> {
    status: &'static str,
    cancelled_by: &'a str,
    cancelled_by_type: &'a str,
    cancellation_reason: &'a str,
}

/// Orchestrates validation, availability checks, persistence and auditing
/// for appointments.
///
/// Holds no mutable state of its own; share it behind an `Arc`.
pub struct SchedulingEngine<S, A, C = SystemClock> {
    store: S,
    audit: A,
    clock: C,
}

impl<S: AppointmentStore, A: AuditRecorder> SchedulingEngine<S, A, SystemClock> {
    pub fn new(store: S, audit: A) -> Self {
        Self::with_clock(store, audit, SystemClock)
    }
}

impl<S, A, C> SchedulingEngine<S, A, C>
where
    S: AppointmentStore,
    A: AuditRecorder,
    C: Clock,
{
    pub fn with_clock(store: S, audit: A, clock: C) -> Self {
        Self { store, audit, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audit(&self) -> &A {
        &self.audit
    }

    /// The calendar day bookings are currently validated against.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Book a new `pending` appointment.
    ///
    /// Validates the date (format, then not in the past) and the start time
    /// before touching storage. When an attendant is given, the slot must be
    /// free; a booking that loses a race at write time is also a conflict.
    pub async fn create(&self, req: &CreateAppointmentRequest) -> SchedulingResult<Appointment> {
        let date = parse_bookable_date("appointment_date", &req.appointment_date, &self.clock)?;
        let start = parse_start_time(&req.start_time)?;

        if let Some(attended_by) = req.attended_by {
            self.ensure_slot_free(SlotQuery {
                appointment_date: date,
                start_time: start,
                attended_by,
                exclude_id: None,
            })
            .await?;
        }

        let input = CreateAppointment {
            client_id: req.client_id,
            service_id: req.service_id,
            appointment_date: date,
            start_time: start,
            end_time: scheduling::end_time(start),
            attended_by: req.attended_by,
            status: AppointmentStatus::Pending.as_str().to_string(),
        };
        let appointment = self.store.insert(&input).await?;

        tracing::info!(
            appointment_id = %appointment.id,
            client_id = %appointment.client_id,
            date = %appointment.appointment_date,
            start_time = %appointment.start_time,
            "Appointment created",
        );
        Ok(appointment)
    }

    /// Apply a partial update.
    ///
    /// A change to date, start time or attendant re-checks the effective slot
    /// (excluding this appointment) unless the same call also changes the
    /// status. A cancelled appointment accepts no further changes.
    pub async fn update(
        &self,
        id: DbId,
        req: &UpdateAppointmentRequest,
    ) -> SchedulingResult<Appointment> {
        if req.is_empty() {
            return Err(CoreError::validation("request", "no fields to update").into());
        }

        let status = req
            .status
            .as_deref()
            .map(|raw| raw.parse::<AppointmentStatus>())
            .transpose()?;
        let date = req
            .appointment_date
            .as_deref()
            .map(|raw| parse_bookable_date("appointment_date", raw, &self.clock))
            .transpose()?;
        let start = req.start_time.as_deref().map(parse_start_time).transpose()?;

        let current = self.require(id).await?;
        let current_status = current.status()?;
        match status {
            Some(target) => validate_status_change(current_status, target)?,
            None if current_status.is_terminal() => {
                return Err(CoreError::Conflict(format!(
                    "appointment is {current_status} and can no longer be modified"
                ))
                .into());
            }
            None => {}
        }

        if req.changes_slot() && status.is_none() {
            if let Some(attended_by) = req.attended_by.or(current.attended_by) {
                self.ensure_slot_free(SlotQuery {
                    appointment_date: date.unwrap_or(current.appointment_date),
                    start_time: start.unwrap_or(current.start_time),
                    attended_by,
                    exclude_id: Some(id),
                })
                .await?;
            }
        }

        let changes = UpdateAppointment {
            appointment_date: date,
            start_time: start,
            end_time: start.map(scheduling::end_time),
            attended_by: req.attended_by,
            status: status.map(|s| s.as_str().to_string()),
        };
        // `None` here means the row was cancelled after our read.
        let updated = self
            .store
            .update(id, &changes)
            .await?
            .ok_or_else(|| CoreError::Conflict(ALREADY_CANCELLED.to_string()))?;

        tracing::info!(appointment_id = %id, status = %updated.status, "Appointment updated");
        Ok(updated)
    }

    /// Cancel an appointment and record the change in the audit trail.
    ///
    /// The audit write happens after the cancellation is stored. If it fails
    /// the failure is logged and the cancelled appointment is still returned.
    pub async fn cancel(
        &self,
        id: DbId,
        req: &CancelAppointmentRequest,
    ) -> SchedulingResult<Appointment> {
        let role: CancelledByType = req.cancelled_by_type.parse()?;
        let cancelled_by = required("cancelled_by", &req.cancelled_by)?;
        let reason = required("reason", &req.reason)?;

        let current = self.require(id).await?;
        if current.is_cancelled() {
            return Err(CoreError::Conflict(ALREADY_CANCELLED.to_string()).into());
        }

        let change = CancelAppointment {
            cancelled_by: cancelled_by.to_string(),
            cancelled_by_type: role.as_str().to_string(),
            cancellation_reason: reason.to_string(),
        };
        // `None` here means another request cancelled it after our read.
        let cancelled = self
            .store
            .cancel(id, &change)
            .await?
            .ok_or_else(|| CoreError::Conflict(ALREADY_CANCELLED.to_string()))?;

        tracing::info!(
            appointment_id = %id,
            cancelled_by_type = %role,
            "Appointment cancelled",
        );

        self.record_cancellation(&current, &change, role).await;
        Ok(cancelled)
    }

    /// Cancel on behalf of a client identified by DNI.
    pub async fn cancel_by_client(
        &self,
        id: DbId,
        client_dni: &str,
        reason: &str,
    ) -> SchedulingResult<Appointment> {
        self.cancel_as(id, CancelledByType::Client, client_dni, reason).await
    }

    /// Cancel on behalf of an employee identified by email.
    pub async fn cancel_by_employee(
        &self,
        id: DbId,
        employee_email: &str,
        reason: &str,
    ) -> SchedulingResult<Appointment> {
        self.cancel_as(id, CancelledByType::Employee, employee_email, reason).await
    }

    async fn cancel_as(
        &self,
        id: DbId,
        role: CancelledByType,
        cancelled_by: &str,
        reason: &str,
    ) -> SchedulingResult<Appointment> {
        let req = CancelAppointmentRequest {
            cancelled_by: cancelled_by.to_string(),
            cancelled_by_type: role.as_str().to_string(),
            reason: reason.to_string(),
        };
        self.cancel(id, &req).await
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Whether `attended_by` is free at `date` / `start_time`.
    ///
    /// Only the formats are validated; past dates are answered normally.
    pub async fn check_availability(
        &self,
        date: &str,
        start_time: &str,
        attended_by: DbId,
    ) -> SchedulingResult<bool> {
        let slot = SlotQuery {
            appointment_date: parse_date("date", date)?,
            start_time: parse_start_time(start_time)?,
            attended_by,
            exclude_id: None,
        };
        Ok(self.store.is_slot_available(&slot).await?)
    }

    pub async fn get(&self, id: DbId) -> SchedulingResult<Appointment> {
        self.require(id).await
    }

    pub async fn get_with_details(&self, id: DbId) -> SchedulingResult<AppointmentWithDetails> {
        self.store
            .find_with_details(id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "Appointment", id }.into())
    }

    /// Appointments dated within `[start_date, end_date]`, earliest first.
    pub async fn list_by_date_range(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> SchedulingResult<Vec<AppointmentWithDetails>> {
        let start = parse_date("start_date", start_date)?;
        let end = parse_date("end_date", end_date)?;
        if start > end {
            return Err(
                CoreError::validation("start_date", "start date cannot be after end date").into(),
            );
        }
        Ok(self.store.list_by_date_range(start, end).await?)
    }

    pub async fn list_by_client(
        &self,
        client_id: DbId,
    ) -> SchedulingResult<Vec<AppointmentWithDetails>> {
        Ok(self.store.list_by_client(client_id).await?)
    }

    /// Audit entries for one appointment, newest first.
    pub async fn audit_history(&self, id: DbId) -> SchedulingResult<Vec<AuditLog>> {
        Ok(self.audit.history(tables::APPOINTMENTS, id).await?)
    }

    /// Audit entries for `table` created on any day in `[from, to]`, newest first.
    pub async fn audit_by_date_range(
        &self,
        table: &str,
        from: &str,
        to: &str,
    ) -> SchedulingResult<Vec<AuditLog>> {
        let table = required("table", table)?;
        let (from, to) = day_range_bounds(parse_date("from", from)?, parse_date("to", to)?)?;
        Ok(self.audit.created_between(table, from, to).await?)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn require(&self, id: DbId) -> SchedulingResult<Appointment> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "Appointment", id }.into())
    }

    async fn ensure_slot_free(&self, slot: SlotQuery) -> SchedulingResult<()> {
        if self.store.is_slot_available(&slot).await? {
            return Ok(());
        }
        tracing::debug!(
            date = %slot.appointment_date,
            start_time = %slot.start_time,
            attended_by = %slot.attended_by,
            "Slot already booked",
        );
        Err(CoreError::Conflict(SLOT_UNAVAILABLE.to_string()).into())
    }

    async fn record_cancellation(
        &self,
        before: &Appointment,
        change: &CancelAppointment,
        role: CancelledByType,
    ) {
        let after = CancellationSnapshot {
            status: AppointmentStatus::Cancelled.as_str(),
            cancelled_by: &change.cancelled_by,
            cancelled_by_type: &change.cancelled_by_type,
            cancellation_reason: &change.cancellation_reason,
        };
        let entry = AuditEntry {
            table_name: tables::APPOINTMENTS,
            record_id: before.id,
            action: actions::CANCEL,
            old_values: Some(before),
            new_values: Some(&after),
            changed_by: &change.cancelled_by,
            changed_by_type: actor_type_for(role),
            reason: Some(&change.cancellation_reason),
        };

        if let Err(e) = self.audit.record(&entry).await {
            tracing::warn!(
                appointment_id = %before.id,
                error = %e,
                "Failed to record cancellation in audit log",
            );
        }
    }
}

/// Trimmed value of a required text field.
fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::validation(field, format!("{field} is required")));
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
