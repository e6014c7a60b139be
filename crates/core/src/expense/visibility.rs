//! Visibility and counting rules for expense records.
//!
//! A record is *visible* in a month when it should be listed for that month,
//! and *counted* when its value contributes to that month's totals. Counting
//! is stricter: a cancelled record keeps being listed through the month it
//! was cancelled in but never contributes to a total.

use crate::calendar::Period;

use super::types::{ExpenseRecord, ExpenseStatus};

/// Whether the record should be listed for `period`.
///
/// Rules, first match wins:
/// 1. settled records are never visible;
/// 2. a malformed start period hides the record;
/// 3. a cancelled record needs a cancellation timestamp and is hidden after
///    its cancellation month;
/// 4. months before the start are hidden;
/// 5. otherwise the repetition schedule decides.
#[must_use]
pub fn is_visible(record: &ExpenseRecord, period: Period) -> bool {
    if record.status == ExpenseStatus::Settled {
        return false;
    }
    if !record.start.is_valid() {
        return false;
    }
    if record.status == ExpenseStatus::Cancelled {
        let Some(cancelled) = record.cancellation_period() else {
            return false;
        };
        if period > cancelled {
            return false;
        }
    }
    record.schedule().covers(record.offset_of(period))
}

/// Whether the record's value counts toward the totals of `period`.
///
/// Same as [`is_visible`] except cancelled records never count, not even in
/// the months they are still listed.
#[must_use]
pub fn will_count(record: &ExpenseRecord, period: Period) -> bool {
    if matches!(
        record.status,
        ExpenseStatus::Settled | ExpenseStatus::Cancelled
    ) {
        return false;
    }
    if !record.start.is_valid() {
        return false;
    }
    record.schedule().covers(record.offset_of(period))
}
