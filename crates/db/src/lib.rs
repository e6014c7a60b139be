//! Persistence layer for Tally.
//!
//! This crate provides:
//! - An in-process store shared by all request handlers
//! - Repository abstractions for data access
//!
//! Repository methods are async so callers do not change when a durable
//! backend replaces the in-process tables.
#![allow(clippy::unused_async)]

pub mod error;
pub mod repositories;
pub mod store;

pub use error::DbError;
pub use repositories::{
    CollaboratorRepository, ExpenseRepository, PreferencesRepository, ShareRepository,
    UserRepository,
};
pub use store::{Database, StoreStats};

/// Opens the store.
#[must_use]
pub fn connect() -> Database {
    tracing::info!("Using in-process store");
    Database::new()
}
