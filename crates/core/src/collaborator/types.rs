//! Collaborator data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_shared::types::{CollaboratorId, UserId};

/// A named grouping for expense records, owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    /// Unique identifier.
    pub id: CollaboratorId,
    /// Owning user.
    pub owner_id: UserId,
    /// Display name, unique per owner ignoring case.
    pub name: String,
    /// Position in the manual ordering; unordered collaborators sort last.
    pub order_index: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
