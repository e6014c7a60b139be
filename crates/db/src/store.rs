//! In-process tables backing the repositories.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tally_core::auth::User;
use tally_core::collaborator::Collaborator;
use tally_core::dashboard::ViewPreferences;
use tally_core::expense::ExpenseRecord;
use tally_core::sharing::{ShareGrant, ShareToken};
use tally_shared::types::{CollaboratorId, ExpenseId, ShareGrantId, ShareTokenId, UserId};

/// Handle to the store. Cheap to clone; clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct Database {
    pub(crate) tables: Arc<Tables>,
}

/// Lock order: `collaborator_locks`, then `collaborators`, then `expenses`.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) users: DashMap<UserId, User>,
    pub(crate) users_by_email: DashMap<String, UserId>,
    pub(crate) collaborators: DashMap<CollaboratorId, Collaborator>,
    /// One entry per owner; holding it serializes that owner's collaborator writes.
    pub(crate) collaborator_locks: DashMap<UserId, ()>,
    pub(crate) expenses: DashMap<ExpenseId, ExpenseRecord>,
    pub(crate) share_tokens: DashMap<ShareTokenId, ShareToken>,
    pub(crate) share_grants: DashMap<ShareGrantId, ShareGrant>,
    pub(crate) preferences: DashMap<UserId, ViewPreferences>,
}

impl Tables {
    /// Records of `owner_id` assigned to `collaborator_id`.
    pub(crate) fn expenses_referencing(
        &self,
        owner_id: UserId,
        collaborator_id: CollaboratorId,
    ) -> usize {
        self.expenses
            .iter()
            .filter(|r| r.owner_id == owner_id && r.collaborator_id == collaborator_id)
            .count()
    }
}

impl Database {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Row counts per table.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let t = &self.tables;
        StoreStats {
            users: t.users.len(),
            collaborators: t.collaborators.len(),
            expenses: t.expenses.len(),
            share_grants: t.share_grants.len(),
        }
    }
}

/// Row counts reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Registered accounts.
    pub users: usize,
    /// Collaborators across all owners.
    pub collaborators: usize,
    /// Expense records across all owners.
    pub expenses: usize,
    /// Active share grants.
    pub share_grants: usize,
}
