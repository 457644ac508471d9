//! Error types for data access.

use sapa_core::CoreError;
use thiserror::Error;

/// Errors that can occur when talking to the booking database.
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to establish a connection.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Query or procedure call failed.
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// A result column has a type the console cannot display.
    #[error("unsupported type '{type_name}' in column '{column}'")]
    UnsupportedType { column: String, type_name: String },

    /// Referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input rejected before reaching the database.
    #[error(transparent)]
    Core(#[from] CoreError),
}
