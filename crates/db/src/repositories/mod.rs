//! Repository abstractions for data access.
//!
//! Every repository wraps a cloned [`Database`](crate::Database) handle.
//! Owner-scoped repositories treat another owner's rows as missing.

pub mod collaborator;
pub mod expense;
pub mod preferences;
pub mod share;
pub mod user;

pub use collaborator::CollaboratorRepository;
pub use expense::ExpenseRepository;
pub use preferences::PreferencesRepository;
pub use share::ShareRepository;
pub use user::UserRepository;
