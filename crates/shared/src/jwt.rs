//! JWT token generation and validation.
//!
//! Provides secure JWT handling with access and refresh tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{Claims, TokenPair};
use crate::error::AppError;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expires_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expires_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_expires_secs: 900,
            refresh_token_expires_secs: 604_800,
        }
    }
}

/// Kind of token encoded in the `typ` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token accepted by protected routes.
    Access,
    /// Long-lived token only accepted by the refresh endpoint.
    Refresh,
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token is valid but of the wrong kind for this use.
    #[error("wrong token kind")]
    WrongKind,
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::EncodingError(_) => Self::Internal(err.to_string()),
            JwtError::DecodingError(_) | JwtError::Expired | JwtError::WrongKind => {
                Self::Unauthorized(err.to_string())
            }
        }
    }
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expires_secs", &self.config.access_token_expires_secs)
            .field("refresh_token_expires_secs", &self.config.refresh_token_expires_secs)
            .field("secret", &"[hidden]")
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn generate(
        &self,
        user_id: Uuid,
        role: &str,
        typ: TokenKind,
        lifetime_secs: i64,
    ) -> Result<String, JwtError> {
        let expires_at = Utc::now() + Duration::seconds(lifetime_secs);
        let claims = Claims::new(user_id, role, typ, expires_at);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Generates an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_access_token(&self, user_id: Uuid, role: &str) -> Result<String, JwtError> {
        self.generate(
            user_id,
            role,
            TokenKind::Access,
            self.config.access_token_expires_secs,
        )
    }

    /// Generates a refresh token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_refresh_token(&self, user_id: Uuid, role: &str) -> Result<String, JwtError> {
        self.generate(
            user_id,
            role,
            TokenKind::Refresh,
            self.config.refresh_token_expires_secs,
        )
    }

    /// Generates an access/refresh pair.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if either token cannot be generated.
    pub fn generate_pair(&self, user_id: Uuid, role: &str) -> Result<TokenPair, JwtError> {
        Ok(TokenPair::new(
            self.generate_access_token(user_id, role)?,
            self.generate_refresh_token(user_id, role)?,
            self.access_token_expires_in(),
        ))
    }

    /// Validates and decodes a token of any kind.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::DecodingError` if the token is malformed.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Validates a token and requires it to be of the given kind.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::WrongKind` when the token decodes but has another `typ`.
    pub fn validate_kind(&self, token: &str, kind: TokenKind) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.typ == kind {
            Ok(claims)
        } else {
            Err(JwtError::WrongKind)
        }
    }

    /// Returns the access token expiration in seconds.
    #[must_use]
    pub const fn access_token_expires_in(&self) -> i64 {
        self.config.access_token_expires_secs
    }
}
