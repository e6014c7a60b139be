//! Expense record repository.

use std::ops::Deref;

use tally_core::collaborator::Collaborator;
use tally_core::expense::ExpenseRecord;
use tally_shared::types::{CollaboratorId, ExpenseId, UserId};
use tracing::debug;

use crate::error::DbError;
use crate::store::Database;

/// Expense repository, always scoped to an owner.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: Database,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Every record of the owner, oldest first.
    pub async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<ExpenseRecord>, DbError> {
        let mut records: Vec<ExpenseRecord> = self
            .db
            .tables
            .expenses
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .map(|r| r.value().clone())
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    /// Finds one of the owner's records.
    pub async fn find(
        &self,
        owner_id: UserId,
        id: ExpenseId,
    ) -> Result<Option<ExpenseRecord>, DbError> {
        Ok(self
            .db
            .tables
            .expenses
            .get(&id)
            .filter(|r| r.owner_id == owner_id)
            .map(|r| r.value().clone()))
    }

    /// Stores a new record.
    ///
    /// # Errors
    ///
    /// Returns `DbError::MissingReference` unless the record's collaborator
    /// exists for its owner.
    pub async fn insert(&self, record: ExpenseRecord) -> Result<ExpenseRecord, DbError> {
        self.store(record.clone())?;
        debug!(expense_id = %record.id, "Expense stored");
        Ok(record)
    }

    /// Stores a batch of new records, all or none.
    ///
    /// # Errors
    ///
    /// Returns `DbError::MissingReference` if any record's collaborator does
    /// not exist for its owner; records stored before it are removed again.
    pub async fn insert_many(&self, records: Vec<ExpenseRecord>) -> Result<usize, DbError> {
        let mut stored = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id;
            if let Err(e) = self.store(record) {
                for id in stored {
                    self.db.tables.expenses.remove(&id);
                }
                return Err(e);
            }
            stored.push(id);
        }
        debug!(count = stored.len(), "Expenses stored");
        Ok(stored.len())
    }

    /// Applies `f` to the owner's record while holding its row.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` (converted into `E`) when the record does
    /// not exist for this owner, or whatever `f` returns.
    pub async fn modify<T, E, F>(&self, owner_id: UserId, id: ExpenseId, f: F) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(&mut ExpenseRecord) -> Result<T, E>,
    {
        self.modify_row(owner_id, id, f)
    }

    /// Like [`ExpenseRepository::modify`] for an update that assigns the
    /// record to `collaborator_id`. The collaborator's row is held until the
    /// update is done, so it cannot be deleted in between.
    ///
    /// # Errors
    ///
    /// Returns `DbError::MissingReference` (converted into `E`) when the
    /// collaborator does not exist for this owner, otherwise as `modify`.
    pub async fn modify_assigned<T, E, F>(
        &self,
        owner_id: UserId,
        id: ExpenseId,
        collaborator_id: CollaboratorId,
        f: F,
    ) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(&mut ExpenseRecord) -> Result<T, E>,
    {
        let _collaborator = self.assigned_collaborator(owner_id, collaborator_id)?;
        self.modify_row(owner_id, id, f)
    }

    /// Deletes one of the owner's records.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` if it does not exist for this owner.
    pub async fn delete(&self, owner_id: UserId, id: ExpenseId) -> Result<(), DbError> {
        self.db
            .tables
            .expenses
            .remove_if(&id, |_, r| r.owner_id == owner_id)
            .map(|_| debug!(expense_id = %id, "Expense deleted"))
            .ok_or(DbError::NotFound("Expense"))
    }

    fn store(&self, record: ExpenseRecord) -> Result<(), DbError> {
        let _collaborator = self.assigned_collaborator(record.owner_id, record.collaborator_id)?;
        self.db.tables.expenses.insert(record.id, record);
        Ok(())
    }

    fn modify_row<T, E, F>(&self, owner_id: UserId, id: ExpenseId, f: F) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(&mut ExpenseRecord) -> Result<T, E>,
    {
        let mut row = self
            .db
            .tables
            .expenses
            .get_mut(&id)
            .filter(|r| r.owner_id == owner_id)
            .ok_or(DbError::NotFound("Expense"))?;
        let result = f(row.value_mut())?;
        debug!(expense_id = %id, "Expense updated");
        Ok(result)
    }

    /// Read guard on the collaborator; holding it blocks its deletion.
    fn assigned_collaborator(
        &self,
        owner_id: UserId,
        collaborator_id: CollaboratorId,
    ) -> Result<impl Deref<Target = Collaborator> + '_, DbError> {
        self.db
            .tables
            .collaborators
            .get(&collaborator_id)
            .filter(|c| c.owner_id == owner_id)
            .ok_or(DbError::MissingReference("Collaborator"))
    }
}
