//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde_json::json;
use tally_db::UserRepository;
use tally_shared::types::UserId;
use tally_shared::{Claims, JwtError, TokenKind};
use tracing::{error, info};

use crate::AppState;
use crate::error::reject;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates access tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates it as an access token
/// 3. Rejects users that no longer exist or were disabled
/// 4. Stores the claims, with the user's current role, in request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return reject(
            StatusCode::UNAUTHORIZED,
            "missing_token",
            "Authorization header with Bearer token is required",
        );
    };

    let mut claims = match state.jwt_service.validate_kind(token, TokenKind::Access) {
        Ok(claims) => claims,
        Err(JwtError::Expired) => {
            return reject(StatusCode::UNAUTHORIZED, "token_expired", "Token has expired");
        }
        Err(_) => {
            return reject(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid or malformed token",
            );
        }
    };

    let user_repo = UserRepository::new(state.db.clone());
    match user_repo.find_by_id(claims.user_id()).await {
        Ok(Some(user)) if user.is_active => {
            claims.role = user.role.to_string();
        }
        Ok(_) => {
            info!(user_id = %claims.user_id(), "Token presented for missing or disabled user");
            return reject(
                StatusCode::UNAUTHORIZED,
                "account_disabled",
                "This account has been disabled",
            );
        }
        Err(e) => {
            error!(error = %e, "Failed to load user during authentication");
            return reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An error occurred",
            );
        }
    }

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// Extractor for authenticated user claims.
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let user_id = auth.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.0.user_id()
    }

    /// Returns true for administrators.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0.is_admin()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}
