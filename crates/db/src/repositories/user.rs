//! User repository.

use dashmap::mapref::entry::Entry;
use tally_core::auth::User;
use tally_shared::types::UserId;
use tracing::debug;

use crate::error::DbError;
use crate::store::Database;

/// User repository for account storage.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Finds a user by email, ignoring case.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let key = User::normalize_email(email);
        let Some(id) = self.db.tables.users_by_email.get(&key).map(|r| *r.value()) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    /// Finds a user by ID.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DbError> {
        Ok(self.db.tables.users.get(&id).map(|r| r.value().clone()))
    }

    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Conflict` if the email is already registered.
    pub async fn create(&self, user: User) -> Result<User, DbError> {
        let key = User::normalize_email(&user.email);
        match self.db.tables.users_by_email.entry(key) {
            Entry::Occupied(_) => Err(DbError::Conflict(
                "Email is already registered".to_string(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.db.tables.users.insert(user.id, user.clone());
                debug!(user_id = %user.id, "User stored");
                Ok(user)
            }
        }
    }

    /// All users, oldest first.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let mut users: Vec<User> = self
            .db
            .tables
            .users
            .iter()
            .map(|r| r.value().clone())
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(users)
    }

    /// Applies `f` to the stored user while holding its row.
    ///
    /// Email changes are not supported through this path.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` (converted into `E`) for an unknown id,
    /// or whatever `f` returns.
    pub async fn modify<T, E, F>(&self, id: UserId, f: F) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(&mut User) -> Result<T, E>,
    {
        let mut row = self
            .db
            .tables
            .users
            .get_mut(&id)
            .ok_or(DbError::NotFound("User"))?;
        let result = f(row.value_mut())?;
        debug!(user_id = %id, "User updated");
        Ok(result)
    }
}
