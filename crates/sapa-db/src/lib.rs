//! Data access for the SAPA admin console.
//!
//! Every operation maps onto one stored procedure or view of the booking
//! database. Results come back as [`TableResult`](sapa_core::TableResult)s
//! labelled for display.
//!
//! Backends:
//! - [`MySqlStore`] - the production database, through a `sqlx` pool
//! - [`InMemoryStore`] - seeded demo data for offline use and tests

pub mod columns;
pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod mysql;
pub mod store;

pub use config::DbConfig;
pub use error::DbError;
pub use memory::InMemoryStore;
pub use models::{
    DashboardCounts, LoginOutcome, NewDepartment, NewHospital, NewTimeslot, TimeslotDetails,
};
pub use mysql::MySqlStore;
pub use store::AdminStore;
