pub mod appointments;
pub mod audit;
