//! Dashboard data types.

use rust_decimal::Decimal;
use serde::Serialize;
use tally_shared::types::{CollaboratorId, ExpenseId};

use crate::calendar::Period;
use crate::expense::{ExpenseStatus, InstallmentLabel, PaymentState};

/// Amount totals for a month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Sum of counted values.
    pub total: Decimal,
    /// Counted values already paid.
    pub paid_total: Decimal,
    /// `total - paid_total`.
    pub pending_total: Decimal,
}

impl Totals {
    /// Adds one counted value.
    pub fn add(&mut self, value: Decimal, paid: bool) {
        self.total += value;
        if paid {
            self.paid_total += value;
        }
        self.pending_total = self.total - self.paid_total;
    }

    /// Folds another set of totals into this one.
    pub fn merge(&mut self, other: &Self) {
        self.total += other.total;
        self.paid_total += other.paid_total;
        self.pending_total = self.total - self.paid_total;
    }
}

/// One record as listed for a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseLine {
    /// Record id.
    pub id: ExpenseId,
    /// Record description.
    pub description: String,
    /// Value per occurrence.
    pub value: Decimal,
    /// Installment progress label.
    pub label: InstallmentLabel,
    /// Record status.
    pub status: ExpenseStatus,
    /// Whether the value counts toward the month's totals.
    pub counted: bool,
    /// Payment state as of the month.
    pub payment: PaymentState,
}

/// One collaborator group in a monthly summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollaboratorSummary {
    /// `None` for the bucket of records whose collaborator no longer exists.
    pub collaborator_id: Option<CollaboratorId>,
    /// Display name.
    pub name: String,
    /// Manual order index.
    pub order_index: Option<i32>,
    /// Folded in the view.
    pub collapsed: bool,
    /// Group totals.
    pub totals: Totals,
    /// Visible records, by description.
    pub lines: Vec<ExpenseLine>,
}

/// Everything shown for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    /// Month summarized.
    pub period: Period,
    /// Groups in display order.
    pub collaborators: Vec<CollaboratorSummary>,
    /// Totals across all shown groups.
    pub totals: Totals,
}

/// Totals for one month of a year overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthTotal {
    /// Month.
    pub period: Period,
    /// Sum of counted values.
    pub total: Decimal,
    /// Counted values paid as of that month.
    pub paid_total: Decimal,
}

/// Twelve months of totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearOverview {
    /// Year covered.
    pub year: i32,
    /// January through December.
    pub months: Vec<MonthTotal>,
    /// Sum over the year.
    pub total: Decimal,
    /// Paid sum over the year.
    pub paid_total: Decimal,
}
