//! Collaborator error types.

use tally_shared::AppError;
use thiserror::Error;

/// Errors raised by collaborator operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollaboratorError {
    /// Name is empty after trimming.
    #[error("Collaborator name is required")]
    EmptyName,

    /// Another collaborator of the same owner already uses the name.
    #[error("A collaborator named '{0}' already exists")]
    DuplicateName(String),

    /// The ordering is not a permutation of the owner's collaborators.
    #[error("Order must list every collaborator exactly once")]
    InvalidOrder,

    /// Expense records still reference the collaborator.
    #[error("Collaborator is referenced by {count} expense record(s)")]
    InUse {
        /// Number of referencing records.
        count: usize,
    },
}

impl From<CollaboratorError> for AppError {
    fn from(err: CollaboratorError) -> Self {
        match err {
            CollaboratorError::EmptyName | CollaboratorError::InvalidOrder => {
                Self::Validation(err.to_string())
            }
            CollaboratorError::DuplicateName(_) => Self::Conflict(err.to_string()),
            CollaboratorError::InUse { .. } => Self::BusinessRule(err.to_string()),
        }
    }
}
