//! Sharing error types.

use tally_shared::AppError;
use thiserror::Error;

/// Errors raised while redeeming tokens or checking access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SharingError {
    /// No token matches.
    #[error("Share token not found")]
    TokenNotFound,

    /// The token is past its expiry.
    #[error("Share token has expired")]
    Expired,

    /// The token was already used.
    #[error("Share token was already redeemed")]
    AlreadyRedeemed,

    /// Owners cannot redeem their own tokens.
    #[error("Cannot redeem your own share token")]
    SelfRedeem,

    /// The requester has no grant for the owner's data.
    #[error("No access to this user's data")]
    NotShared,
}

impl From<SharingError> for AppError {
    fn from(err: SharingError) -> Self {
        match err {
            SharingError::TokenNotFound => Self::NotFound(err.to_string()),
            SharingError::Expired | SharingError::AlreadyRedeemed | SharingError::SelfRedeem => {
                Self::BusinessRule(err.to_string())
            }
            SharingError::NotShared => Self::Forbidden(err.to_string()),
        }
    }
}
