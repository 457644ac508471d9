//! Core domain errors.

use thiserror::Error;

/// Core domain errors for the admin console.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// A row does not have one cell per column.
    #[error("Row {row} has {actual} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown status value coming from the database.
    #[error("Unknown status: {0}")]
    UnknownStatus(String),
}
