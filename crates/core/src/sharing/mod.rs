//! Read-only sharing of one user's data with another.
//!
//! An owner issues a one-time token; whoever redeems it becomes a viewer of
//! the owner's collaborators, expenses and dashboard.

pub mod error;
pub mod service;
pub mod types;

pub use error::SharingError;
pub use service::SharingService;
pub use types::{ShareGrant, ShareToken};
