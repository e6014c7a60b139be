//! Installment progress labels.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::calendar::Period;

use super::types::{ExpenseRecord, Schedule};

/// Progress label shown next to a record for one month.
///
/// Serializes as its display string (`"2/3"`, `"Fixed"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallmentLabel {
    /// Cancelled before the month being viewed: `—`.
    Expired,
    /// Recurring record: `Fixed`.
    Fixed,
    /// One-off record: `-`.
    OneOff,
    /// Installment `current` of `total`.
    Progress {
        /// One-based installment number, clamped to at least 1.
        current: u32,
        /// Number of installments.
        total: u32,
    },
    /// The plan has run its course: `Settled`.
    Settled,
}

impl fmt::Display for InstallmentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => f.write_str("—"),
            Self::Fixed => f.write_str("Fixed"),
            Self::OneOff => f.write_str("-"),
            Self::Progress { current, total } => write!(f, "{current}/{total}"),
            Self::Settled => f.write_str("Settled"),
        }
    }
}

impl Serialize for InstallmentLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Label for `record` as seen from `period`.
///
/// Never fails: a month before the start clamps to the first installment and
/// malformed negative totals read as `Fixed`.
#[must_use]
pub fn installment_label(record: &ExpenseRecord, period: Period) -> InstallmentLabel {
    if record.is_cancelled_before(period) {
        return InstallmentLabel::Expired;
    }
    match record.schedule() {
        Schedule::Recurring => InstallmentLabel::Fixed,
        Schedule::OneOff => InstallmentLabel::OneOff,
        Schedule::Installments(total) => {
            let k = record.offset_of(period) + 1;
            if k > i64::from(total) {
                InstallmentLabel::Settled
            } else {
                InstallmentLabel::Progress {
                    current: u32::try_from(k.max(1)).unwrap_or(1),
                    total,
                }
            }
        }
    }
}
