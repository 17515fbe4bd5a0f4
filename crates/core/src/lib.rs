//! Domain rules for appointment scheduling.
//!
//! This crate has zero internal deps so the persistence layer, the scheduling
//! engine and the HTTP surface can all share the same vocabulary.

pub mod audit;
pub mod error;
pub mod scheduling;
pub mod status;
pub mod types;
