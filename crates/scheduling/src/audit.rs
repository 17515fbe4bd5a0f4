//! Audit recorder contract and its Postgres implementation.

use std::future::Future;

use agenda_core::types::{DbId, Timestamp};
use agenda_db::models::audit::{AuditLog, CreateAuditLog};
use agenda_db::repositories::AuditLogRepo;
use agenda_db::DbPool;
use serde::Serialize;

use crate::error::AuditError;

/// Structured description of one audited change.
///
/// `old_values` and `new_values` are serialized independently when the entry
/// is recorded.
#[derive(Debug)]
pub struct AuditEntry<'a, O, N> {
    pub table_name: &'a str,
    pub record_id: DbId,
    pub action: &'a str,
    pub old_values: Option<&'a O>,
    pub new_values: Option<&'a N>,
    pub changed_by: &'a str,
    pub changed_by_type: &'a str,
    pub reason: Option<&'a str>,
}

impl<O: Serialize, N: Serialize> AuditEntry<'_, O, N> {
    /// Serialize both snapshots into an insertable row.
    pub fn to_record(&self) -> Result<CreateAuditLog, serde_json::Error> {
        Ok(CreateAuditLog {
            table_name: self.table_name.to_string(),
            record_id: self.record_id,
            action: self.action.to_string(),
            old_values: self.old_values.map(serde_json::to_value).transpose()?,
            new_values: self.new_values.map(serde_json::to_value).transpose()?,
            changed_by: self.changed_by.to_string(),
            changed_by_type: self.changed_by_type.to_string(),
            reason: self.reason.map(str::to_string),
        })
    }
}

/// Append-only store of audit entries.
pub trait AuditRecorder: Send + Sync {
    /// Append one entry with a system-assigned timestamp.
    fn record<O, N>(
        &self,
        entry: &AuditEntry<'_, O, N>,
    ) -> impl Future<Output = Result<AuditLog, AuditError>> + Send
    where
        O: Serialize + Sync,
        N: Serialize + Sync;

    /// Entries for one record, newest first.
    fn history(
        &self,
        table_name: &str,
        record_id: DbId,
    ) -> impl Future<Output = Result<Vec<AuditLog>, AuditError>> + Send;

    /// Entries for a table created in `[from, to)`, newest first.
    fn created_between(
        &self,
        table_name: &str,
        from: Timestamp,
        to: Timestamp,
    ) -> impl Future<Output = Result<Vec<AuditLog>, AuditError>> + Send;
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// [`AuditRecorder`] backed by the `audit_logs` table.
#[derive(Clone)]
pub struct PgAuditRecorder {
    pool: DbPool,
}

impl PgAuditRecorder {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl AuditRecorder for PgAuditRecorder {
    async fn record<O, N>(&self, entry: &AuditEntry<'_, O, N>) -> Result<AuditLog, AuditError>
    where
        O: Serialize + Sync,
        N: Serialize + Sync,
    {
        let row = entry.to_record()?;
        Ok(AuditLogRepo::insert(&self.pool, &row).await?)
    }

    async fn history(&self, table_name: &str, record_id: DbId) -> Result<Vec<AuditLog>, AuditError> {
        Ok(AuditLogRepo::list_for_record(&self.pool, table_name, record_id).await?)
    }

    async fn created_between(
        &self,
        table_name: &str,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<AuditLog>, AuditError> {
        Ok(AuditLogRepo::list_by_created_range(&self.pool, table_name, from, to).await?)
    }
}
