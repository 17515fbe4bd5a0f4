/// All primary keys are UUIDs assigned by the database.
pub type DbId = uuid::Uuid;

/// All system timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
