//! Audit log entity models and DTOs.
//!
//! Audit logs have no `updated_at` field (immutable records).

use agenda_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Audit log entity
// ---------------------------------------------------------------------------

/// A single audit log entry. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub table_name: String,
    pub record_id: DbId,
    pub action: String,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub changed_by: String,
    pub changed_by_type: String,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// DTO for inserting a new audit log entry. Snapshots are already serialized.
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub table_name: String,
    pub record_id: DbId,
    pub action: String,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub changed_by: String,
    pub changed_by_type: String,
    pub reason: Option<String>,
}
