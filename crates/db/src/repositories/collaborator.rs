//! Collaborator repository.

use std::cmp::Ordering;

use tally_core::collaborator::Collaborator;
use tally_shared::types::{CollaboratorId, UserId};
use tracing::debug;

use crate::error::DbError;
use crate::store::Database;

/// Collaborator repository, always scoped to an owner.
#[derive(Debug, Clone)]
pub struct CollaboratorRepository {
    db: Database,
}

impl CollaboratorRepository {
    /// Creates a new collaborator repository.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// The owner's collaborators in manual order (unordered last), then by name.
    pub async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Collaborator>, DbError> {
        Ok(self.owned(owner_id))
    }

    /// Finds one of the owner's collaborators.
    pub async fn find(
        &self,
        owner_id: UserId,
        id: CollaboratorId,
    ) -> Result<Option<Collaborator>, DbError> {
        Ok(self
            .db
            .tables
            .collaborators
            .get(&id)
            .filter(|r| r.owner_id == owner_id)
            .map(|r| r.value().clone()))
    }

    /// Applies `f` to the owner's full collaborator list while holding the
    /// owner's collaborator lock, then writes the list back.
    ///
    /// New entries pushed by `f` are inserted and changed ones replaced.
    /// Entries `f` removes from the list are not deleted; see
    /// [`CollaboratorRepository::delete_unused`]. Nothing is written when `f`
    /// fails.
    pub async fn modify_all<T, E, F>(&self, owner_id: UserId, f: F) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(&mut Vec<Collaborator>) -> Result<T, E>,
    {
        let tables = &self.db.tables;
        let _owner = tables.collaborator_locks.entry(owner_id).or_default();

        let mut list = self.owned(owner_id);
        let result = f(&mut list)?;

        for collaborator in list.into_iter().filter(|c| c.owner_id == owner_id) {
            tables.collaborators.insert(collaborator.id, collaborator);
        }
        debug!(owner_id = %owner_id, "Collaborators saved");
        Ok(result)
    }

    /// Deletes one of the owner's collaborators if `guard` accepts the number
    /// of expense records still assigned to it.
    ///
    /// The count and the removal happen under the collaborator's row lock, so
    /// no record can be assigned to it in between.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` (converted into `E`) if it does not exist
    /// for this owner, or whatever `guard` returns.
    pub async fn delete_unused<E, F>(
        &self,
        owner_id: UserId,
        id: CollaboratorId,
        guard: F,
    ) -> Result<(), E>
    where
        E: From<DbError>,
        F: FnOnce(usize) -> Result<(), E>,
    {
        let tables = &self.db.tables;
        let _owner = tables.collaborator_locks.entry(owner_id).or_default();

        let mut rejected = None;
        let removed = tables.collaborators.remove_if(&id, |_, c| {
            if c.owner_id != owner_id {
                return false;
            }
            match guard(tables.expenses_referencing(owner_id, id)) {
                Ok(()) => true,
                Err(e) => {
                    rejected = Some(e);
                    false
                }
            }
        });

        if removed.is_some() {
            debug!(collaborator_id = %id, "Collaborator deleted");
            return Ok(());
        }
        Err(rejected.unwrap_or_else(|| DbError::NotFound("Collaborator").into()))
    }

    fn owned(&self, owner_id: UserId) -> Vec<Collaborator> {
        let mut list: Vec<Collaborator> = self
            .db
            .tables
            .collaborators
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .map(|r| r.value().clone())
            .collect();
        list.sort_by(|a, b| {
            match (a.order_index, b.order_index) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        list
    }
}
