//! Share token issue and redemption, and read access checks.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use tally_shared::types::{ShareGrantId, ShareTokenId, UserId};

use super::error::SharingError;
use super::types::{ShareGrant, ShareToken};

/// Sharing service.
pub struct SharingService;

impl SharingService {
    /// Generates a URL-safe random token from 32 random bytes.
    #[must_use]
    pub fn generate_token() -> String {
        let bytes: [u8; 32] = rand::random();
        base64_url::encode(&bytes)
    }

    /// SHA-256 hex digest used to store and look up tokens.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Issues a token for `owner_id` valid for `ttl_hours`.
    ///
    /// Returns the stored token and the raw value to hand out.
    #[must_use]
    pub fn issue(owner_id: UserId, ttl_hours: i64, now: DateTime<Utc>) -> (ShareToken, String) {
        let raw = Self::generate_token();
        let expires_at = Duration::try_hours(ttl_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let token = ShareToken {
            id: ShareTokenId::new(),
            owner_id,
            token_hash: Self::hash_token(&raw),
            expires_at,
            redeemed_by: None,
            redeemed_at: None,
            created_at: now,
        };
        (token, raw)
    }

    /// Redeems `token` for `viewer_id`, marking it used.
    ///
    /// # Errors
    ///
    /// Returns `SharingError::SelfRedeem`, `SharingError::AlreadyRedeemed` or
    /// `SharingError::Expired`, leaving the token untouched.
    pub fn redeem(
        token: &mut ShareToken,
        viewer_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<ShareGrant, SharingError> {
        if token.owner_id == viewer_id {
            return Err(SharingError::SelfRedeem);
        }
        if token.redeemed_by.is_some() {
            return Err(SharingError::AlreadyRedeemed);
        }
        if token.is_expired(now) {
            return Err(SharingError::Expired);
        }

        token.redeemed_by = Some(viewer_id);
        token.redeemed_at = Some(now);

        Ok(ShareGrant {
            id: ShareGrantId::new(),
            owner_id: token.owner_id,
            viewer_id,
            token_id: token.id,
            created_at: now,
        })
    }

    /// Whose data a read request addresses.
    ///
    /// No `owner_id` (or the requester's own id) means the requester's data.
    /// Anything else needs a grant from that owner to the requester.
    ///
    /// # Errors
    ///
    /// Returns `SharingError::NotShared` when no grant exists.
    pub fn resolve_reader(
        requester: UserId,
        owner_id: Option<UserId>,
        grants: &[ShareGrant],
    ) -> Result<UserId, SharingError> {
        match owner_id {
            None => Ok(requester),
            Some(owner) if owner == requester => Ok(requester),
            Some(owner) => {
                let shared = grants
                    .iter()
                    .any(|g| g.owner_id == owner && g.viewer_id == requester);
                if shared {
                    Ok(owner)
                } else {
                    Err(SharingError::NotShared)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 10, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_generated_tokens_are_url_safe_and_unique() {
        let a = SharingService::generate_token();
        let b = SharingService::generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_hash_is_sha256_hex() {
        let hash = SharingService::hash_token("abc");
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_issue_stores_only_hash() {
        let owner = UserId::new();
        let (token, raw) = SharingService::issue(owner, 72, now());

        assert_eq!(token.owner_id, owner);
        assert_eq!(token.token_hash, SharingService::hash_token(&raw));
        assert_ne!(token.token_hash, raw);
        assert_eq!(token.expires_at, now() + Duration::hours(72));
        let json = serde_json::to_string(&token).unwrap();
        assert!(!json.contains(&token.token_hash));
    }

    #[test]
    fn test_redeem_creates_grant_once() {
        let owner = UserId::new();
        let viewer = UserId::new();
        let (mut token, _) = SharingService::issue(owner, 72, now());

        let grant = SharingService::redeem(&mut token, viewer, now()).unwrap();
        assert_eq!(grant.owner_id, owner);
        assert_eq!(grant.viewer_id, viewer);
        assert_eq!(grant.token_id, token.id);
        assert_eq!(token.redeemed_by, Some(viewer));

        assert_eq!(
            SharingService::redeem(&mut token, UserId::new(), now()),
            Err(SharingError::AlreadyRedeemed)
        );
    }

    #[test]
    fn test_redeem_rejects_expired_and_self() {
        let owner = UserId::new();
        let (mut token, _) = SharingService::issue(owner, 1, now());

        assert_eq!(
            SharingService::redeem(&mut token, owner, now()),
            Err(SharingError::SelfRedeem)
        );
        assert_eq!(
            SharingService::redeem(&mut token, UserId::new(), now() + Duration::hours(1)),
            Err(SharingError::Expired)
        );
        assert_eq!(token.redeemed_by, None);
    }

    #[test]
    fn test_resolve_reader() {
        let owner = UserId::new();
        let viewer = UserId::new();
        let stranger = UserId::new();
        let (mut token, _) = SharingService::issue(owner, 72, now());
        let grants = vec![SharingService::redeem(&mut token, viewer, now()).unwrap()];

        assert_eq!(SharingService::resolve_reader(viewer, None, &grants), Ok(viewer));
        assert_eq!(
            SharingService::resolve_reader(owner, Some(owner), &grants),
            Ok(owner)
        );
        assert_eq!(
            SharingService::resolve_reader(viewer, Some(owner), &grants),
            Ok(owner)
        );
        assert_eq!(
            SharingService::resolve_reader(stranger, Some(owner), &grants),
            Err(SharingError::NotShared)
        );
        assert_eq!(
            SharingService::resolve_reader(owner, Some(viewer), &grants),
            Err(SharingError::NotShared)
        );
    }
}
