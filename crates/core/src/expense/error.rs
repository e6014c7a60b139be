//! Expense lifecycle error types.

use tally_shared::AppError;
use thiserror::Error;

/// Errors raised while creating or mutating expense records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpenseError {
    /// Description is empty after trimming.
    #[error("Description is required")]
    EmptyDescription,

    /// Value is negative.
    #[error("Value cannot be negative")]
    NegativeValue,

    /// Start or target month is out of range.
    #[error("Invalid period: {year}-{month}")]
    InvalidPeriod {
        /// Year component.
        year: i32,
        /// Month component.
        month: u32,
    },

    /// Installment total is negative.
    #[error("Installment total must be zero or positive, got {0}")]
    InvalidInstallments(i32),

    /// A cancellation month was given for a record that stays uncancelled.
    #[error("A cancellation month only applies to cancelled records")]
    CancellationMonthWithoutCancel,

    /// Settled records cannot be cancelled or restored.
    #[error("Settled records cannot change cancellation state")]
    SettledRecord,
}

impl From<ExpenseError> for AppError {
    fn from(err: ExpenseError) -> Self {
        match err {
            ExpenseError::SettledRecord => Self::BusinessRule(err.to_string()),
            ExpenseError::EmptyDescription
            | ExpenseError::NegativeValue
            | ExpenseError::InvalidPeriod { .. }
            | ExpenseError::InvalidInstallments(_)
            | ExpenseError::CancellationMonthWithoutCancel => Self::Validation(err.to_string()),
        }
    }
}
