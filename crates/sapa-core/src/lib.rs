//! SAPA Admin Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Database drivers
//! - Terminal/UI frameworks
//! - Runtime specifics
//!
//! Query results travel through the console as [`TableResult`]s and land in
//! [`DataGrid`]s owned by the UI.

pub mod error;
pub mod grid;
pub mod ids;
pub mod status;
pub mod table;

// Re-export commonly used types
pub use error::CoreError;
pub use grid::DataGrid;
pub use ids::{AppointmentId, DepartmentId, HospitalId, SchoolId, SlotDateId, TimeslotId, UserId};
pub use status::{AppointmentStatus, SchoolStats, SchoolStatus};
pub use table::{CellValue, Row, TableResult};
