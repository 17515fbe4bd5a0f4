use agenda_core::error::CoreError;

/// Message used for every slot collision, whether caught by the availability
/// check or by the storage uniqueness constraint.
pub const SLOT_UNAVAILABLE: &str = "the requested time slot is not available";

/// Failure reported by an [`AppointmentStore`](crate::AppointmentStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The write collided with another active booking of the same slot.
    #[error("slot already booked")]
    SlotTaken,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Failure reported by an [`AuditRecorder`](crate::AuditRecorder).
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Failed to serialize audit snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Error returned by every [`SchedulingEngine`](crate::SchedulingEngine) operation.
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    /// Validation, conflict or not-found outcome.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Unexpected storage failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;

impl From<StoreError> for SchedulingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SlotTaken => CoreError::Conflict(SLOT_UNAVAILABLE.to_string()).into(),
            StoreError::Database(e) => Self::Database(e),
        }
    }
}

impl From<AuditError> for SchedulingError {
    fn from(err: AuditError) -> Self {
        match err {
            AuditError::Serialize(e) => CoreError::Internal(e.to_string()).into(),
            AuditError::Database(e) => Self::Database(e),
        }
    }
}
