//! Persistence error types.

use tally_shared::AppError;
use thiserror::Error;

/// Errors returned by repositories.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DbError {
    /// No row matched.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A row references another row that does not exist for the same owner.
    #[error("{0} does not exist")]
    MissingReference(&'static str),

    /// A uniqueness constraint was violated.
    #[error("{0}")]
    Conflict(String),
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(_) => Self::NotFound(err.to_string()),
            DbError::MissingReference(_) => Self::Validation(err.to_string()),
            DbError::Conflict(msg) => Self::Conflict(msg),
        }
    }
}
