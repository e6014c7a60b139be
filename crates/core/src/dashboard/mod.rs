//! Monthly and yearly dashboard aggregation.
//!
//! This module provides:
//! - Per-collaborator monthly summaries with totals
//! - Twelve-month overviews
//! - View preferences injected into every summary call

pub mod preferences;
pub mod service;
pub mod types;

pub use preferences::{SortOrder, ViewPreferences};
pub use service::DashboardService;
pub use types::{CollaboratorSummary, ExpenseLine, MonthTotal, MonthlySummary, Totals, YearOverview};
