//! Sharing data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_shared::types::{ShareGrantId, ShareTokenId, UserId};

/// Stored half of a share token. The raw token is never kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareToken {
    /// Unique identifier.
    pub id: ShareTokenId,
    /// User whose data the token shares.
    pub owner_id: UserId,
    /// SHA-256 hex digest of the raw token.
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// The token is rejected at or after this instant.
    pub expires_at: DateTime<Utc>,
    /// Redeeming user, once redeemed.
    pub redeemed_by: Option<UserId>,
    /// Redemption time.
    pub redeemed_at: Option<DateTime<Utc>>,
    /// Issue time.
    pub created_at: DateTime<Utc>,
}

impl ShareToken {
    /// Whether the token can no longer be redeemed because of its age.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Read-only access of `viewer_id` to `owner_id`'s data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareGrant {
    /// Unique identifier.
    pub id: ShareGrantId,
    /// Sharing user.
    pub owner_id: UserId,
    /// Viewing user.
    pub viewer_id: UserId,
    /// Token the grant came from.
    pub token_id: ShareTokenId,
    /// Grant time.
    pub created_at: DateTime<Utc>,
}
