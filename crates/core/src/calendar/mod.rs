//! Calendar periods and month arithmetic.

pub mod period;

pub use period::{Period, PeriodError, months_between};
