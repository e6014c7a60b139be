//! Expense records and the month-by-month rules that drive them.

pub mod error;
pub mod label;
pub mod payment;
pub mod service;
pub mod types;
pub mod visibility;
pub mod wire;


pub use error::ExpenseError;
pub use label::{InstallmentLabel, installment_label};
pub use payment::{PaymentState, is_paid_in_period, payment_state};
pub use service::{CreateExpenseInput, ExpenseService, UpdateExpenseInput};
pub use types::{ExpenseRecord, ExpenseStatus, Schedule};
pub use visibility::{is_visible, will_count};
pub use wire::{AccountDocument, LegacyFinanceDocument, StoredExpense, StoredPeriod};
