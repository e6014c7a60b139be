//! View preferences repository.

use tally_core::dashboard::ViewPreferences;
use tally_shared::types::UserId;
use tracing::debug;

use crate::error::DbError;
use crate::store::Database;

/// Per-user view preferences.
#[derive(Debug, Clone)]
pub struct PreferencesRepository {
    db: Database,
}

impl PreferencesRepository {
    /// Creates a new preferences repository.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Stored preferences, or the defaults.
    pub async fn get(&self, user_id: UserId) -> Result<ViewPreferences, DbError> {
        Ok(self
            .db
            .tables
            .preferences
            .get(&user_id)
            .map(|r| r.value().clone())
            .unwrap_or_default())
    }

    /// Replaces the user's preferences.
    pub async fn put(
        &self,
        user_id: UserId,
        preferences: ViewPreferences,
    ) -> Result<ViewPreferences, DbError> {
        self.db
            .tables
            .preferences
            .insert(user_id, preferences.clone());
        debug!(user_id = %user_id, "Preferences saved");
        Ok(preferences)
    }
}
