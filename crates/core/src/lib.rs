//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `calendar` - Calendar periods and month arithmetic
//! - `expense` - Expense records, visibility/counting rules, payment state, labels
//! - `collaborator` - Collaborators that group expense records
//! - `dashboard` - Monthly and yearly aggregation, view preferences
//! - `sharing` - Share tokens and read-only grants between users
//! - `auth` - Password hashing and user roles

pub mod auth;
pub mod calendar;
pub mod collaborator;
pub mod dashboard;
pub mod expense;
pub mod sharing;

#[cfg(test)]
pub(crate) mod test_support;
