//! Shared fixtures for unit tests.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;
use tally_shared::types::{CollaboratorId, ExpenseId, UserId};

use crate::calendar::Period;
use crate::expense::{ExpenseRecord, ExpenseStatus};

/// Unvalidated period shorthand.
pub const fn p(year: i32, month: u32) -> Period {
    Period { year, month }
}

/// Noon UTC on the given day.
pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

/// Pending record worth 100.00 starting at `start`.
pub fn record(start: Period, installment_total: Option<i32>) -> ExpenseRecord {
    let created = at(2024, 1, 1);
    ExpenseRecord {
        id: ExpenseId::new(),
        owner_id: UserId::new(),
        collaborator_id: CollaboratorId::new(),
        description: "Test expense".to_string(),
        value: dec!(100.00),
        start,
        installment_total,
        status: ExpenseStatus::Pending,
        cancelled_at: None,
        paid: false,
        paid_at: None,
        paid_by_month: None,
        created_at: created,
        updated_at: created,
    }
}

/// `record` cancelled with effect in `period`.
pub fn cancelled(mut record: ExpenseRecord, period: Period) -> ExpenseRecord {
    record.status = ExpenseStatus::Cancelled;
    record.cancelled_at = period.start_instant();
    record
}
