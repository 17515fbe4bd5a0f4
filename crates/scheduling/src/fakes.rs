//! In-memory store and audit doubles for engine tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use agenda_core::status::AppointmentStatus;
use agenda_core::types::{DbId, Timestamp};
use agenda_db::models::appointment::{
    Appointment, AppointmentWithDetails, CancelAppointment, CreateAppointment, SlotQuery,
    UpdateAppointment,
};
use agenda_db::models::audit::AuditLog;
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::audit::{AuditEntry, AuditRecorder};
use crate::error::{AuditError, StoreError};
use crate::store::AppointmentStore;

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Vec-backed store that enforces active-slot uniqueness on every write,
/// like the database index does.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Appointment>>,
    force_unavailable: AtomicBool,
    availability_checks: AtomicUsize,
}

impl MemoryStore {
    pub fn all(&self) -> Vec<Appointment> {
        self.rows.lock().unwrap().clone()
    }

    /// When `false`, every availability query reports the slot as taken.
    pub fn set_slot_available(&self, available: bool) {
        self.force_unavailable.store(!available, Ordering::SeqCst);
    }

    pub fn availability_checks(&self) -> usize {
        self.availability_checks.load(Ordering::SeqCst)
    }

    fn slot_taken(rows: &[Appointment], slot: &SlotQuery) -> bool {
        rows.iter().any(|row| {
            !row.is_cancelled()
                && row.appointment_date == slot.appointment_date
                && row.start_time == slot.start_time
                && row.attended_by == Some(slot.attended_by)
                && Some(row.id) != slot.exclude_id
        })
    }
}

fn with_details(appointment: Appointment) -> AppointmentWithDetails {
    AppointmentWithDetails {
        appointment,
        client_name: "Ana Torres".to_string(),
        client_dni: "12345678".to_string(),
        service_name: "Haircut".to_string(),
        service_price: 35.0,
        service_duration: 60,
    }
}

fn slot_of(
    date: NaiveDate,
    start: NaiveTime,
    attended_by: Option<DbId>,
    exclude_id: Option<DbId>,
) -> Option<SlotQuery> {
    attended_by.map(|attended_by| SlotQuery {
        appointment_date: date,
        start_time: start,
        attended_by,
        exclude_id,
    })
}

impl AppointmentStore for MemoryStore {
    async fn insert(&self, input: &CreateAppointment) -> Result<Appointment, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(slot) = slot_of(input.appointment_date, input.start_time, input.attended_by, None) {
            if Self::slot_taken(&rows, &slot) {
                return Err(StoreError::SlotTaken);
            }
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: DbId::new_v4(),
            client_id: input.client_id,
            service_id: input.service_id,
            appointment_date: input.appointment_date,
            start_time: input.start_time,
            end_time: input.end_time,
            attended_by: input.attended_by,
            status: input.status.clone(),
            cancelled_by: None,
            cancelled_by_type: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };
        rows.push(appointment.clone());
        Ok(appointment)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Appointment>, StoreError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn find_with_details(
        &self,
        id: DbId,
    ) -> Result<Option<AppointmentWithDetails>, StoreError> {
        Ok(self.find_by_id(id).await?.map(with_details))
    }

    async fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AppointmentWithDetails>, StoreError> {
        let mut rows: Vec<_> = self
            .all()
            .into_iter()
            .filter(|r| r.appointment_date >= start && r.appointment_date <= end)
            .collect();
        rows.sort_by_key(|r| (r.appointment_date, r.start_time));
        Ok(rows.into_iter().map(with_details).collect())
    }

    async fn list_by_client(
        &self,
        client_id: DbId,
    ) -> Result<Vec<AppointmentWithDetails>, StoreError> {
        let mut rows: Vec<_> = self
            .all()
            .into_iter()
            .filter(|r| r.client_id == client_id)
            .collect();
        rows.sort_by_key(|r| std::cmp::Reverse((r.appointment_date, r.start_time)));
        Ok(rows.into_iter().map(with_details).collect())
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateAppointment,
    ) -> Result<Option<Appointment>, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(index) = rows.iter().position(|r| r.id == id && !r.is_cancelled()) else {
            return Ok(None);
        };

        let mut next = rows[index].clone();
        if let Some(date) = input.appointment_date {
            next.appointment_date = date;
        }
        if let Some(start) = input.start_time {
            next.start_time = start;
        }
        if let Some(end) = input.end_time {
            next.end_time = end;
        }
        if let Some(attended_by) = input.attended_by {
            next.attended_by = Some(attended_by);
        }
        if let Some(status) = &input.status {
            next.status = status.clone();
        }
        next.updated_at = Utc::now();

        if !next.is_cancelled() {
            let slot = slot_of(next.appointment_date, next.start_time, next.attended_by, Some(id));
            if slot.is_some_and(|slot| Self::slot_taken(&rows, &slot)) {
                return Err(StoreError::SlotTaken);
            }
        }

        rows[index] = next.clone();
        Ok(Some(next))
    }

    async fn cancel(
        &self,
        id: DbId,
        input: &CancelAppointment,
    ) -> Result<Option<Appointment>, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|r| r.id == id && !r.is_cancelled()) else {
            return Ok(None);
        };
        row.status = AppointmentStatus::Cancelled.as_str().to_string();
        row.cancelled_by = Some(input.cancelled_by.clone());
        row.cancelled_by_type = Some(input.cancelled_by_type.clone());
        row.cancellation_reason = Some(input.cancellation_reason.clone());
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn is_slot_available(&self, slot: &SlotQuery) -> Result<bool, StoreError> {
        self.availability_checks.fetch_add(1, Ordering::SeqCst);
        if self.force_unavailable.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(!Self::slot_taken(&self.rows.lock().unwrap(), slot))
    }
}

// ---------------------------------------------------------------------------
// OptimisticStore
// ---------------------------------------------------------------------------

/// Reports every slot as free, so only the write-time uniqueness check can
/// catch a double booking. Models two requests racing past the read.
#[derive(Default)]
pub struct OptimisticStore {
    inner: MemoryStore,
}

impl AppointmentStore for OptimisticStore {
    async fn insert(&self, input: &CreateAppointment) -> Result<Appointment, StoreError> {
        self.inner.insert(input).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Appointment>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn find_with_details(
        &self,
        id: DbId,
    ) -> Result<Option<AppointmentWithDetails>, StoreError> {
        self.inner.find_with_details(id).await
    }

    async fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AppointmentWithDetails>, StoreError> {
        self.inner.list_by_date_range(start, end).await
    }

    async fn list_by_client(
        &self,
        client_id: DbId,
    ) -> Result<Vec<AppointmentWithDetails>, StoreError> {
        self.inner.list_by_client(client_id).await
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateAppointment,
    ) -> Result<Option<Appointment>, StoreError> {
        self.inner.update(id, input).await
    }

    async fn cancel(
        &self,
        id: DbId,
        input: &CancelAppointment,
    ) -> Result<Option<Appointment>, StoreError> {
        self.inner.cancel(id, input).await
    }

    async fn is_slot_available(&self, _slot: &SlotQuery) -> Result<bool, StoreError> {
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// CancelsAfterRead
// ---------------------------------------------------------------------------

/// Cancels the appointment as soon as it has been read, so the engine's next
/// write races a cancellation it has not seen.
#[derive(Default)]
pub struct CancelsAfterRead {
    inner: MemoryStore,
}

impl CancelsAfterRead {
    pub fn all(&self) -> Vec<Appointment> {
        self.inner.all()
    }
}

impl AppointmentStore for CancelsAfterRead {
    async fn insert(&self, input: &CreateAppointment) -> Result<Appointment, StoreError> {
        self.inner.insert(input).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Appointment>, StoreError> {
        let found = self.inner.find_by_id(id).await?;
        let other = CancelAppointment {
            cancelled_by: "other".to_string(),
            cancelled_by_type: "employee".to_string(),
            cancellation_reason: "closed".to_string(),
        };
        self.inner.cancel(id, &other).await?;
        Ok(found)
    }

    async fn find_with_details(
        &self,
        id: DbId,
    ) -> Result<Option<AppointmentWithDetails>, StoreError> {
        self.inner.find_with_details(id).await
    }

    async fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AppointmentWithDetails>, StoreError> {
        self.inner.list_by_date_range(start, end).await
    }

    async fn list_by_client(
        &self,
        client_id: DbId,
    ) -> Result<Vec<AppointmentWithDetails>, StoreError> {
        self.inner.list_by_client(client_id).await
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateAppointment,
    ) -> Result<Option<Appointment>, StoreError> {
        self.inner.update(id, input).await
    }

    async fn cancel(
        &self,
        id: DbId,
        input: &CancelAppointment,
    ) -> Result<Option<Appointment>, StoreError> {
        self.inner.cancel(id, input).await
    }

    async fn is_slot_available(&self, slot: &SlotQuery) -> Result<bool, StoreError> {
        self.inner.is_slot_available(slot).await
    }
}

// ---------------------------------------------------------------------------
// Audit doubles
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryAudit {
    entries: Mutex<Vec<AuditLog>>,
}

impl MemoryAudit {
    /// Recorded entries in insertion order.
    pub fn entries(&self) -> Vec<AuditLog> {
        self.entries.lock().unwrap().clone()
    }

    fn newest_first(&self, keep: impl Fn(&AuditLog) -> bool) -> Vec<AuditLog> {
        let mut found: Vec<_> = self.entries().into_iter().filter(|e| keep(e)).collect();
        found.reverse();
        found
    }
}

impl AuditRecorder for MemoryAudit {
    async fn record<O, N>(&self, entry: &AuditEntry<'_, O, N>) -> Result<AuditLog, AuditError>
    where
        O: Serialize + Sync,
        N: Serialize + Sync,
    {
        let row = entry.to_record()?;
        let log = AuditLog {
            id: DbId::new_v4(),
            table_name: row.table_name,
            record_id: row.record_id,
            action: row.action,
            old_values: row.old_values,
            new_values: row.new_values,
            changed_by: row.changed_by,
            changed_by_type: row.changed_by_type,
            reason: row.reason,
            created_at: Utc::now(),
        };
        self.entries.lock().unwrap().push(log.clone());
        Ok(log)
    }

    async fn history(&self, table_name: &str, record_id: DbId) -> Result<Vec<AuditLog>, AuditError> {
        Ok(self.newest_first(|e| e.table_name == table_name && e.record_id == record_id))
    }

    async fn created_between(
        &self,
        table_name: &str,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<AuditLog>, AuditError> {
        Ok(self.newest_first(|e| {
            e.table_name == table_name && e.created_at >= from && e.created_at < to
        }))
    }
}

/// Every call fails as if the database were unreachable.
pub struct FailingAudit;

fn unreachable_db() -> AuditError {
    AuditError::Database(sqlx::Error::PoolTimedOut)
}

impl AuditRecorder for FailingAudit {
    async fn record<O, N>(&self, _entry: &AuditEntry<'_, O, N>) -> Result<AuditLog, AuditError>
    where
        O: Serialize + Sync,
        N: Serialize + Sync,
    {
        Err(unreachable_db())
    }

    async fn history(&self, _table_name: &str, _record_id: DbId) -> Result<Vec<AuditLog>, AuditError> {
        Err(unreachable_db())
    }

    async fn created_between(
        &self,
        _table_name: &str,
        _from: Timestamp,
        _to: Timestamp,
    ) -> Result<Vec<AuditLog>, AuditError> {
        Err(unreachable_db())
    }
}
