//! Appointment scheduling engine.
//!
//! The [`SchedulingEngine`] validates requests, consults the availability
//! oracle, drives status changes and records cancellations in the audit
//! trail. Persistence is reached through the [`AppointmentStore`] and
//! [`AuditRecorder`] contracts; Postgres implementations live alongside them.

pub mod audit;
pub mod engine;
pub mod error;
pub mod requests;
pub mod store;

#[cfg(test)]
mod fakes;

pub use audit::{AuditEntry, AuditRecorder, PgAuditRecorder};
pub use engine::SchedulingEngine;
pub use error::{AuditError, SchedulingError, SchedulingResult, StoreError};
pub use requests::{CancelAppointmentRequest, CreateAppointmentRequest, UpdateAppointmentRequest};
pub use store::{AppointmentStore, PgAppointmentStore};
