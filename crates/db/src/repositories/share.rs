//! Share token and grant repository.

use tally_core::sharing::{ShareGrant, ShareToken};
use tally_shared::types::{ShareGrantId, UserId};
use tracing::debug;

use crate::error::DbError;
use crate::store::Database;

/// Share repository.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    db: Database,
}

impl ShareRepository {
    /// Creates a new share repository.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Stores an issued token.
    pub async fn insert_token(&self, token: ShareToken) -> Result<ShareToken, DbError> {
        self.db.tables.share_tokens.insert(token.id, token.clone());
        debug!(token_id = %token.id, "Share token stored");
        Ok(token)
    }

    /// Applies `f` to the token with this hash while holding its row.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` (converted into `E`) when no token has the
    /// hash, or whatever `f` returns.
    pub async fn modify_token_by_hash<T, E, F>(&self, token_hash: &str, f: F) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(&mut ShareToken) -> Result<T, E>,
    {
        let id = self
            .db
            .tables
            .share_tokens
            .iter()
            .find(|r| r.token_hash == token_hash)
            .map(|r| *r.key())
            .ok_or(DbError::NotFound("Share token"))?;
        let mut row = self
            .db
            .tables
            .share_tokens
            .get_mut(&id)
            .ok_or(DbError::NotFound("Share token"))?;
        f(row.value_mut())
    }

    /// Stores a grant, replacing any earlier grant between the same pair.
    pub async fn upsert_grant(&self, grant: ShareGrant) -> Result<ShareGrant, DbError> {
        self.db
            .tables
            .share_grants
            .retain(|_, g| !(g.owner_id == grant.owner_id && g.viewer_id == grant.viewer_id));
        self.db.tables.share_grants.insert(grant.id, grant.clone());
        debug!(grant_id = %grant.id, "Share grant stored");
        Ok(grant)
    }

    /// Grants where the user is owner or viewer, newest first.
    pub async fn grants_involving(&self, user_id: UserId) -> Result<Vec<ShareGrant>, DbError> {
        let mut grants: Vec<ShareGrant> = self
            .db
            .tables
            .share_grants
            .iter()
            .filter(|r| r.owner_id == user_id || r.viewer_id == user_id)
            .map(|r| r.value().clone())
            .collect();
        grants.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(grants)
    }

    /// Grants the user holds as viewer.
    pub async fn grants_for_viewer(&self, viewer_id: UserId) -> Result<Vec<ShareGrant>, DbError> {
        Ok(self
            .db
            .tables
            .share_grants
            .iter()
            .filter(|r| r.viewer_id == viewer_id)
            .map(|r| r.value().clone())
            .collect())
    }

    /// Revokes one of the owner's grants.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` if the owner has no such grant.
    pub async fn delete_grant(&self, owner_id: UserId, id: ShareGrantId) -> Result<(), DbError> {
        self.db
            .tables
            .share_grants
            .remove_if(&id, |_, g| g.owner_id == owner_id)
            .map(|_| debug!(grant_id = %id, "Share grant revoked"))
            .ok_or(DbError::NotFound("Share grant"))
    }
}
