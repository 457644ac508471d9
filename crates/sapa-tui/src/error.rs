//! Error types for the admin console binary.

use sapa_core::CoreError;
use sapa_db::DbError;
use thiserror::Error;

/// Errors that end a console or headless run.
#[derive(Debug, Error)]
pub enum AppError {
    /// Terminal or log file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Could not reach the database.
    #[error(transparent)]
    Db(#[from] DbError),

    /// A command-line value was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] CoreError),

    /// The operation ran but reported a failure.
    #[error("{0}")]
    Operation(String),

    /// Output could not be serialized.
    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
