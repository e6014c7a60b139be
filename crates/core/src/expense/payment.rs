//! Paid-state resolution per month.
//!
//! Recurring records track payment independently per month through
//! `paid_by_month`. Every other record carries a single payment timestamp that
//! covers the month it was made in and all later months.

use serde::{Deserialize, Serialize};

use crate::calendar::Period;

use super::types::ExpenseRecord;

/// Payment state of a record as seen from one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    /// Paid in or before this month.
    Paid,
    /// No payment covering this month.
    Unpaid,
    /// A payment exists but was made in a later month.
    PaidLater,
}

/// Whether the record counts as paid as of `period`.
#[must_use]
pub fn is_paid_in_period(record: &ExpenseRecord, period: Period) -> bool {
    if record.is_recurring()
        && let Some(by_month) = &record.paid_by_month
    {
        return by_month.get(&period.key()).copied().unwrap_or(false);
    }
    if let Some(paid_at) = &record.paid_at {
        return Period::of(paid_at) <= period;
    }
    record.paid
}

/// Payment state of the record as seen from `period`.
///
/// Distinguishes a record that is unpaid from one whose only payment was
/// made after the month being viewed.
#[must_use]
pub fn payment_state(record: &ExpenseRecord, period: Period) -> PaymentState {
    if is_paid_in_period(record, period) {
        return PaymentState::Paid;
    }
    let tracked_per_month = record.is_recurring() && record.paid_by_month.is_some();
    let paid_later = !tracked_per_month
        && record
            .paid_at
            .as_ref()
            .is_some_and(|paid_at| Period::of(paid_at) > period);
    if paid_later {
        PaymentState::PaidLater
    } else {
        PaymentState::Unpaid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, p, record};
    use std::collections::BTreeMap;

    #[test]
    fn test_recurring_uses_month_map() {
        let mut r = record(p(2025, 1), None);
        r.paid_by_month = Some(BTreeMap::from([("2025-03".to_string(), true)]));

        assert!(is_paid_in_period(&r, p(2025, 3)));
        assert!(!is_paid_in_period(&r, p(2025, 4)));
        assert!(!is_paid_in_period(&r, p(2025, 2)));
    }

    #[test]
    fn test_recurring_month_map_wins_over_timestamp() {
        let mut r = record(p(2025, 1), None);
        r.paid_by_month = Some(BTreeMap::from([("2025-03".to_string(), false)]));
        r.paid_at = Some(at(2025, 1, 10));
        r.paid = true;

        assert!(!is_paid_in_period(&r, p(2025, 3)));
        assert_eq!(payment_state(&r, p(2025, 3)), PaymentState::Unpaid);
    }

    #[test]
    fn test_one_off_payment_persists_forward() {
        let mut r = record(p(2025, 1), Some(0));
        r.paid_at = Some(at(2025, 2, 14));

        assert!(!is_paid_in_period(&r, p(2025, 1)));
        assert!(is_paid_in_period(&r, p(2025, 2)));
        assert!(is_paid_in_period(&r, p(2025, 3)));
    }

    #[test]
    fn test_paid_later_state() {
        let mut r = record(p(2025, 1), Some(3));
        r.paid_at = Some(at(2025, 2, 1));

        assert_eq!(payment_state(&r, p(2025, 1)), PaymentState::PaidLater);
        assert_eq!(payment_state(&r, p(2025, 2)), PaymentState::Paid);
    }

    #[test]
    fn test_recurring_without_map_falls_back_to_timestamp() {
        let mut r = record(p(2025, 1), None);
        r.paid_at = Some(at(2025, 5, 3));

        assert!(!is_paid_in_period(&r, p(2025, 4)));
        assert!(is_paid_in_period(&r, p(2025, 5)));
        assert_eq!(payment_state(&r, p(2025, 4)), PaymentState::PaidLater);
    }

    #[test]
    fn test_legacy_flag_fallback() {
        let mut r = record(p(2025, 1), Some(2));
        assert!(!is_paid_in_period(&r, p(2025, 1)));
        assert_eq!(payment_state(&r, p(2025, 1)), PaymentState::Unpaid);

        r.paid = true;
        assert!(is_paid_in_period(&r, p(2025, 1)));
        assert!(is_paid_in_period(&r, p(2024, 1)));
    }

    #[test]
    fn test_installment_ignores_month_map() {
        let mut r = record(p(2025, 1), Some(3));
        r.paid_by_month = Some(BTreeMap::from([("2025-01".to_string(), true)]));
        assert!(!is_paid_in_period(&r, p(2025, 1)));
    }
}
