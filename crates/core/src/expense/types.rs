//! Expense record data types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{CollaboratorId, ExpenseId, UserId};

use crate::calendar::{Period, months_between};

/// Lifecycle status of an expense record.
///
/// Aliases accept the status spellings found in older stored documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    /// Active and awaiting payment.
    #[default]
    #[serde(alias = "Pendente", alias = "pendente", alias = "ativo")]
    Pending,
    /// Cancelled; still shown through its cancellation month.
    #[serde(alias = "Cancelado", alias = "cancelado")]
    Cancelled,
    /// Fully paid off; never shown again.
    #[serde(alias = "quitado", alias = "Quitado")]
    Settled,
}

impl std::fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Settled => write!(f, "settled"),
        }
    }
}

/// How a record repeats, derived from its stored installment total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Active every month from its start, unbounded.
    Recurring,
    /// Active only in its start month.
    OneOff,
    /// Active for exactly this many consecutive months.
    Installments(u32),
}

impl Schedule {
    /// Classifies a stored installment total.
    ///
    /// `None` is recurring, `0` is one-off, a positive count is an installment
    /// plan. Negative totals are malformed and fall back to recurring.
    #[must_use]
    pub fn from_total(total: Option<i32>) -> Self {
        match total {
            None => Self::Recurring,
            Some(0) => Self::OneOff,
            Some(n) => u32::try_from(n).map_or(Self::Recurring, Self::Installments),
        }
    }

    /// Whether the schedule is active `offset` months after its start.
    #[must_use]
    pub fn covers(&self, offset: i64) -> bool {
        if offset < 0 {
            return false;
        }
        match self {
            Self::Recurring => true,
            Self::OneOff => offset == 0,
            Self::Installments(n) => offset < i64::from((*n).max(1)),
        }
    }
}

/// One recurring, installment or one-off financial obligation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Unique identifier.
    pub id: ExpenseId,
    /// User who owns the record.
    pub owner_id: UserId,
    /// Collaborator the record is assigned to.
    pub collaborator_id: CollaboratorId,
    /// Free-text label.
    pub description: String,
    /// Amount per occurrence.
    pub value: Decimal,
    /// First month the record applies to.
    pub start: Period,
    /// `None` for recurring, `0`/`1` for one-off, `N > 1` for installments.
    pub installment_total: Option<i32>,
    /// Lifecycle status.
    pub status: ExpenseStatus,
    /// Start of the month the cancellation took effect.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Legacy paid flag, used when no timestamp or month map applies.
    #[serde(default)]
    pub paid: bool,
    /// Time of the last payment action.
    pub paid_at: Option<DateTime<Utc>>,
    /// Per-month paid flags keyed `YYYY-MM`; recurring records only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_by_month: Option<BTreeMap<String, bool>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Repetition schedule of this record.
    #[must_use]
    pub fn schedule(&self) -> Schedule {
        Schedule::from_total(self.installment_total)
    }

    /// True when the record has no installment bound at all.
    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        self.installment_total.is_none()
    }

    /// Month the cancellation took effect, if the record is cancelled.
    #[must_use]
    pub fn cancellation_period(&self) -> Option<Period> {
        match self.status {
            ExpenseStatus::Cancelled => self.cancelled_at.as_ref().map(Period::of),
            ExpenseStatus::Pending | ExpenseStatus::Settled => None,
        }
    }

    /// True when `period` falls after the record's cancellation month.
    #[must_use]
    pub fn is_cancelled_before(&self, period: Period) -> bool {
        self.cancellation_period()
            .is_some_and(|cancelled| period > cancelled)
    }

    /// Zero-based month offset of `period` from the record's start.
    #[must_use]
    pub fn offset_of(&self, period: Period) -> i64 {
        months_between(self.start, period)
    }
}
