pub mod appointment;
pub mod audit;
