//! Repository for the `audit_logs` table.
//!
//! Insert and read only. Audit rows are never updated or deleted.

use agenda_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::audit::{AuditLog, CreateAuditLog};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for `audit_logs` SELECT queries.
const COLUMNS: &str = "\
    id, table_name, record_id, action, old_values, new_values, \
    changed_by, changed_by_type, reason, created_at";

/// Column list for INSERT (excludes auto-generated `id` and `created_at`).
const INSERT_COLUMNS: &str = "\
    table_name, record_id, action, old_values, new_values, \
    changed_by, changed_by_type, reason";

// ---------------------------------------------------------------------------
// AuditLogRepo
// ---------------------------------------------------------------------------

/// Provides append and query operations for audit logs.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append one audit log entry.
    pub async fn insert(pool: &PgPool, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_logs ({INSERT_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(&entry.table_name)
            .bind(entry.record_id)
            .bind(&entry.action)
            .bind(&entry.old_values)
            .bind(&entry.new_values)
            .bind(&entry.changed_by)
            .bind(&entry.changed_by_type)
            .bind(&entry.reason)
            .fetch_one(pool)
            .await
    }

    /// All entries for one record, newest first.
    pub async fn list_for_record(
        pool: &PgPool,
        table_name: &str,
        record_id: DbId,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs
             WHERE table_name = $1 AND record_id = $2
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(table_name)
            .bind(record_id)
            .fetch_all(pool)
            .await
    }

    /// Entries for a table created in `[from, to)`, newest first.
    pub async fn list_by_created_range(
        pool: &PgPool,
        table_name: &str,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs
             WHERE table_name = $1 AND created_at >= $2 AND created_at < $3
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(table_name)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }
}
