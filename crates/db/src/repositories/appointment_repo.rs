//! Repository for the `appointments` table.

use agenda_core::status::AppointmentStatus;
use agenda_core::types::DbId;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::appointment::{
    Appointment, AppointmentWithDetails, CancelAppointment, CreateAppointment, SlotQuery,
    UpdateAppointment,
};

/// Partial unique index enforcing one active booking per slot.
pub const ACTIVE_SLOT_CONSTRAINT: &str = "uq_appointments_active_slot";

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, client_id, service_id, appointment_date, start_time, end_time, \
    attended_by, status, cancelled_by, cancelled_by_type, cancellation_reason, \
    created_at, updated_at";

/// Column list for queries joining `clients` (c) and `services` (s).
const DETAIL_COLUMNS: &str = "\
    a.id, a.client_id, a.service_id, a.appointment_date, a.start_time, a.end_time, \
    a.attended_by, a.status, a.cancelled_by, a.cancelled_by_type, a.cancellation_reason, \
    a.created_at, a.updated_at, \
    CONCAT(c.first_name, ' ', c.last_name) AS client_name, c.dni AS client_dni, \
    s.name AS service_name, s.price::FLOAT8 AS service_price, \
    s.duration_minutes AS service_duration";

const DETAIL_JOINS: &str = "\
    FROM appointments a \
    JOIN clients c ON a.client_id = c.id \
    JOIN services s ON a.service_id = s.id";

/// Provides persistence operations for appointments.
pub struct AppointmentRepo;

impl AppointmentRepo {
    /// Insert a new appointment, returning the created row with its
    /// database-assigned id and timestamps.
    ///
    /// A concurrent booking of the same active slot fails with a unique
    /// violation on [`ACTIVE_SLOT_CONSTRAINT`].
    pub async fn create(
        pool: &PgPool,
        input: &CreateAppointment,
    ) -> Result<Appointment, sqlx::Error> {
        let query = format!(
            "INSERT INTO appointments
                (client_id, service_id, appointment_date, start_time, end_time, attended_by, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(input.client_id)
            .bind(input.service_id)
            .bind(input.appointment_date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.attended_by)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    /// Find an appointment by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM appointments WHERE id = $1");
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an appointment by id, joined with client and service details.
    pub async fn find_with_details(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AppointmentWithDetails>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} {DETAIL_JOINS} WHERE a.id = $1");
        sqlx::query_as::<_, AppointmentWithDetails>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List appointments whose date falls in `[start, end]` (inclusive),
    /// earliest first.
    pub async fn list_by_date_range(
        pool: &PgPool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AppointmentWithDetails>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_JOINS}
             WHERE a.appointment_date BETWEEN $1 AND $2
             ORDER BY a.appointment_date ASC, a.start_time ASC"
        );
        sqlx::query_as::<_, AppointmentWithDetails>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// List a client's appointments, most recent slot first.
    pub async fn list_by_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<AppointmentWithDetails>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} {DETAIL_JOINS}
             WHERE a.client_id = $1
             ORDER BY a.appointment_date DESC, a.start_time DESC"
        );
        sqlx::query_as::<_, AppointmentWithDetails>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Update an appointment. Only non-`None` fields in `input` are applied.
    ///
    /// Cancelled rows are never touched. Returns `None` if no row with the
    /// given `id` exists or it is already cancelled.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAppointment,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!(
            "UPDATE appointments SET
                appointment_date = COALESCE($2, appointment_date),
                start_time = COALESCE($3, start_time),
                end_time = COALESCE($4, end_time),
                attended_by = COALESCE($5, attended_by),
                status = COALESCE($6, status),
                updated_at = NOW()
             WHERE id = $1 AND status <> $7
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .bind(input.appointment_date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.attended_by)
            .bind(&input.status)
            .bind(AppointmentStatus::Cancelled.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Cancel an appointment unless it is already cancelled.
    ///
    /// Status and the three cancellation fields are written in one statement.
    /// Returns `None` when no row was affected (missing or already cancelled).
    pub async fn cancel(
        pool: &PgPool,
        id: DbId,
        input: &CancelAppointment,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!(
            "UPDATE appointments SET
                status = $2,
                cancelled_by = $3,
                cancelled_by_type = $4,
                cancellation_reason = $5,
                updated_at = NOW()
             WHERE id = $1 AND status <> $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .bind(AppointmentStatus::Cancelled.as_str())
            .bind(&input.cancelled_by)
            .bind(&input.cancelled_by_type)
            .bind(&input.cancellation_reason)
            .fetch_optional(pool)
            .await
    }

    /// Whether no active (non-cancelled) appointment occupies the slot.
    pub async fn is_slot_available(pool: &PgPool, slot: &SlotQuery) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT NOT EXISTS (
                SELECT 1 FROM appointments
                WHERE appointment_date = $1
                  AND start_time = $2
                  AND attended_by = $3
                  AND status <> 'cancelled'
                  AND ($4::UUID IS NULL OR id <> $4)
             )",
        )
        .bind(slot.appointment_date)
        .bind(slot.start_time)
        .bind(slot.attended_by)
        .bind(slot.exclude_id)
        .fetch_one(pool)
        .await
    }
}
