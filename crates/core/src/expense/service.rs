//! Expense lifecycle: create, edit, toggle-cancel and mark-paid.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tally_shared::types::{CollaboratorId, ExpenseId, UserId};

use crate::calendar::Period;

use super::error::ExpenseError;
use super::types::{ExpenseRecord, ExpenseStatus};

/// Input for creating an expense record.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Owning user.
    pub owner_id: UserId,
    /// Collaborator the record belongs to.
    pub collaborator_id: CollaboratorId,
    /// Free-text label.
    pub description: String,
    /// Amount per occurrence.
    pub value: Decimal,
    /// First month.
    pub start: Period,
    /// `None` recurring, `0`/`1` one-off, `N` installments.
    pub installment_total: Option<i32>,
}

/// Partial update of an expense record. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseInput {
    /// New collaborator.
    pub collaborator_id: Option<CollaboratorId>,
    /// New description.
    pub description: Option<String>,
    /// New value.
    pub value: Option<Decimal>,
    /// New start month.
    pub start: Option<Period>,
    /// New installment total; `Some(None)` makes the record recurring.
    pub installment_total: Option<Option<i32>>,
    /// New status.
    pub status: Option<ExpenseStatus>,
    /// Month a cancellation takes effect in.
    pub cancelled_in: Option<Period>,
}

/// Expense service for lifecycle rules.
pub struct ExpenseService;

impl ExpenseService {
    /// Builds a new pending record from validated input.
    ///
    /// # Errors
    ///
    /// Returns a validation variant of `ExpenseError` for an empty description,
    /// a negative value, an invalid start month or a negative installment total.
    pub fn create(
        input: CreateExpenseInput,
        now: DateTime<Utc>,
    ) -> Result<ExpenseRecord, ExpenseError> {
        let description = Self::validate_description(&input.description)?;
        Self::validate_value(input.value)?;
        Self::validate_period(input.start)?;
        Self::validate_installments(input.installment_total)?;

        Ok(ExpenseRecord {
            id: ExpenseId::new(),
            owner_id: input.owner_id,
            collaborator_id: input.collaborator_id,
            description,
            value: input.value,
            start: input.start,
            installment_total: input.installment_total,
            status: ExpenseStatus::Pending,
            cancelled_at: None,
            paid: false,
            paid_at: None,
            paid_by_month: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update. Nothing is changed if any field is invalid.
    ///
    /// Moving to `Cancelled` stamps the cancellation month (`cancelled_in`,
    /// else the current month unless already cancelled); moving to `Pending`
    /// or `Settled` clears it.
    ///
    /// # Errors
    ///
    /// Returns the same validation errors as [`ExpenseService::create`], and
    /// `ExpenseError::CancellationMonthWithoutCancel` when `cancelled_in` is
    /// given but the record does not end up cancelled.
    pub fn update(
        record: &mut ExpenseRecord,
        input: UpdateExpenseInput,
        now: DateTime<Utc>,
    ) -> Result<(), ExpenseError> {
        let description = input
            .description
            .as_deref()
            .map(Self::validate_description)
            .transpose()?;
        if let Some(value) = input.value {
            Self::validate_value(value)?;
        }
        if let Some(start) = input.start {
            Self::validate_period(start)?;
        }
        if let Some(total) = input.installment_total {
            Self::validate_installments(total)?;
        }

        let cancelled_at = match input.status.unwrap_or(record.status) {
            ExpenseStatus::Cancelled => {
                let period = input
                    .cancelled_in
                    .or_else(|| record.cancellation_period())
                    .unwrap_or_else(|| Period::of(&now));
                Some(Self::cancellation_instant(period)?)
            }
            ExpenseStatus::Pending | ExpenseStatus::Settled => {
                if input.cancelled_in.is_some() {
                    return Err(ExpenseError::CancellationMonthWithoutCancel);
                }
                None
            }
        };

        if let Some(collaborator_id) = input.collaborator_id {
            record.collaborator_id = collaborator_id;
        }
        if let Some(description) = description {
            record.description = description;
        }
        if let Some(value) = input.value {
            record.value = value;
        }
        if let Some(start) = input.start {
            record.start = start;
        }
        if let Some(total) = input.installment_total {
            record.installment_total = total;
        }
        if let Some(status) = input.status {
            record.status = status;
        }
        record.cancelled_at = cancelled_at;
        record.updated_at = now;

        Ok(())
    }

    /// Flips a record between pending and cancelled.
    ///
    /// Cancelling stamps the start of `at` (or the current month); restoring
    /// clears the stamp. Returns the new status.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::SettledRecord` for settled records and
    /// `ExpenseError::InvalidPeriod` for an out of range month.
    pub fn toggle_cancel(
        record: &mut ExpenseRecord,
        at: Option<Period>,
        now: DateTime<Utc>,
    ) -> Result<ExpenseStatus, ExpenseError> {
        match record.status {
            ExpenseStatus::Settled => return Err(ExpenseError::SettledRecord),
            ExpenseStatus::Pending => {
                let period = at.unwrap_or_else(|| Period::of(&now));
                record.cancelled_at = Some(Self::cancellation_instant(period)?);
                record.status = ExpenseStatus::Cancelled;
            }
            ExpenseStatus::Cancelled => {
                record.cancelled_at = None;
                record.status = ExpenseStatus::Pending;
            }
        }
        record.updated_at = now;
        Ok(record.status)
    }

    /// Records a payment (or its removal) for `period`.
    ///
    /// Recurring records get a per-month entry. Other records get a single
    /// payment timestamp (`paid_at`, defaulting to `now`) that covers every
    /// later month too; unpaying clears it.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::InvalidPeriod` for an out of range month.
    pub fn mark_paid(
        record: &mut ExpenseRecord,
        period: Period,
        paid: bool,
        paid_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(), ExpenseError> {
        Self::validate_period(period)?;

        if record.is_recurring() {
            record
                .paid_by_month
                .get_or_insert_with(BTreeMap::new)
                .insert(period.key(), paid);
        } else {
            record.paid = paid;
            record.paid_at = paid.then(|| paid_at.unwrap_or(now));
        }
        record.updated_at = now;
        Ok(())
    }

    pub(crate) fn validate_description(description: &str) -> Result<String, ExpenseError> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(ExpenseError::EmptyDescription);
        }
        Ok(trimmed.to_string())
    }

    pub(crate) fn validate_value(value: Decimal) -> Result<(), ExpenseError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ExpenseError::NegativeValue);
        }
        Ok(())
    }

    fn validate_period(period: Period) -> Result<(), ExpenseError> {
        if period.is_valid() {
            Ok(())
        } else {
            Err(ExpenseError::InvalidPeriod {
                year: period.year,
                month: period.month,
            })
        }
    }

    fn validate_installments(total: Option<i32>) -> Result<(), ExpenseError> {
        match total {
            Some(n) if n < 0 => Err(ExpenseError::InvalidInstallments(n)),
            _ => Ok(()),
        }
    }

    fn cancellation_instant(period: Period) -> Result<DateTime<Utc>, ExpenseError> {
        Self::validate_period(period)?;
        period.start_instant().ok_or(ExpenseError::InvalidPeriod {
            year: period.year,
            month: period.month,
        })
    }
}
