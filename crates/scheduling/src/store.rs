//! Appointment store contract and its Postgres implementation.
//!
//! The store is also the availability oracle: [`AppointmentStore::is_slot_available`]
//! answers the read-time question, and the store's own uniqueness constraint
//! answers it again at write time (surfaced as [`StoreError::SlotTaken`]).

use std::future::Future;

use agenda_core::types::DbId;
use agenda_db::models::appointment::{
    Appointment, AppointmentWithDetails, CancelAppointment, CreateAppointment, SlotQuery,
    UpdateAppointment,
};
use agenda_db::repositories::{AppointmentRepo, ACTIVE_SLOT_CONSTRAINT};
use agenda_db::DbPool;
use chrono::NaiveDate;

use crate::error::StoreError;

/// Durable record of appointments.
pub trait AppointmentStore: Send + Sync {
    /// Persist a new appointment, returning it with its assigned id and timestamps.
    fn insert(
        &self,
        input: &CreateAppointment,
    ) -> impl Future<Output = Result<Appointment, StoreError>> + Send;

    fn find_by_id(
        &self,
        id: DbId,
    ) -> impl Future<Output = Result<Option<Appointment>, StoreError>> + Send;

    fn find_with_details(
        &self,
        id: DbId,
    ) -> impl Future<Output = Result<Option<AppointmentWithDetails>, StoreError>> + Send;

    fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<Vec<AppointmentWithDetails>, StoreError>> + Send;

    fn list_by_client(
        &self,
        client_id: DbId,
    ) -> impl Future<Output = Result<Vec<AppointmentWithDetails>, StoreError>> + Send;

    /// Write only the `Some` fields of an active appointment. `None` when the
    /// id does not exist or the appointment is cancelled.
    fn update(
        &self,
        id: DbId,
        input: &UpdateAppointment,
    ) -> impl Future<Output = Result<Option<Appointment>, StoreError>> + Send;

    /// Cancel unless already cancelled. `None` when no row was affected.
    fn cancel(
        &self,
        id: DbId,
        input: &CancelAppointment,
    ) -> impl Future<Output = Result<Option<Appointment>, StoreError>> + Send;

    /// True iff no active appointment other than `slot.exclude_id` holds the slot.
    fn is_slot_available(
        &self,
        slot: &SlotQuery,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// [`AppointmentStore`] backed by the `appointments` table.
#[derive(Clone)]
pub struct PgAppointmentStore {
    pool: DbPool,
}

impl PgAppointmentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Translate a unique violation on the active-slot index into [`StoreError::SlotTaken`].
fn classify_write_error(err: sqlx::Error) -> StoreError {
    if agenda_db::is_unique_violation(&err, ACTIVE_SLOT_CONSTRAINT) {
        tracing::warn!("Slot uniqueness constraint rejected a concurrent booking");
        StoreError::SlotTaken
    } else {
        StoreError::Database(err)
    }
}

impl AppointmentStore for PgAppointmentStore {
    async fn insert(&self, input: &CreateAppointment) -> Result<Appointment, StoreError> {
        AppointmentRepo::create(&self.pool, input)
            .await
            .map_err(classify_write_error)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Appointment>, StoreError> {
        Ok(AppointmentRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_with_details(
        &self,
        id: DbId,
    ) -> Result<Option<AppointmentWithDetails>, StoreError> {
        Ok(AppointmentRepo::find_with_details(&self.pool, id).await?)
    }

    async fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AppointmentWithDetails>, StoreError> {
        Ok(AppointmentRepo::list_by_date_range(&self.pool, start, end).await?)
    }

    async fn list_by_client(
        &self,
        client_id: DbId,
    ) -> Result<Vec<AppointmentWithDetails>, StoreError> {
        Ok(AppointmentRepo::list_by_client(&self.pool, client_id).await?)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateAppointment,
    ) -> Result<Option<Appointment>, StoreError> {
        AppointmentRepo::update(&self.pool, id, input)
            .await
            .map_err(classify_write_error)
    }

    async fn cancel(
        &self,
        id: DbId,
        input: &CancelAppointment,
    ) -> Result<Option<Appointment>, StoreError> {
        Ok(AppointmentRepo::cancel(&self.pool, id, input).await?)
    }

    async fn is_slot_available(&self, slot: &SlotQuery) -> Result<bool, StoreError> {
        Ok(AppointmentRepo::is_slot_available(&self.pool, slot).await?)
    }
}
