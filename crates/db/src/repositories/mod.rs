//! Repository layer: one zero-sized struct per table with async query methods.

pub mod appointment_repo;
pub mod audit_repo;

pub use appointment_repo::{AppointmentRepo, ACTIVE_SLOT_CONSTRAINT};
pub use audit_repo::AuditLogRepo;
