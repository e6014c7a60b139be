//! People (or buckets) expense records are assigned to.

pub mod error;
pub mod service;
pub mod types;

pub use error::CollaboratorError;
pub use service::CollaboratorService;
pub use types::Collaborator;
