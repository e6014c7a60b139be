//! Authentication routes for register, login, and token refresh.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use tally_core::auth::{
    User, UserRole, hash_password, validate_password_strength, verify_password,
};
use tally_db::UserRepository;
use tally_shared::auth::{LoginRequest, LoginResponse, RefreshRequest, RegisterRequest};
use tally_shared::types::UserId;
use tally_shared::{AppError, TokenKind};
use tracing::info;

use crate::AppState;
use crate::error::{ApiResult, error_response, reject};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

fn invalid_credentials() -> Response {
    reject(
        StatusCode::UNAUTHORIZED,
        "invalid_credentials",
        "Invalid email or password",
    )
}

fn account_disabled() -> Response {
    reject(
        StatusCode::UNAUTHORIZED,
        "account_disabled",
        "This account has been disabled",
    )
}

/// Issues a token pair and wraps it with the user's info.
fn login_response(state: &AppState, user: &User) -> Result<LoginResponse, Response> {
    let pair = state
        .jwt_service
        .generate_pair(user.id.into_inner(), &user.role.to_string())
        .map_err(error_response)?;
    Ok(LoginResponse {
        user: user.info(),
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        expires_in: pair.expires_in,
    })
}

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult {
    let email = User::normalize_email(&payload.email);
    if !email.contains('@') {
        return Err(error_response(AppError::Validation(
            "A valid email is required".to_string(),
        )));
    }
    let full_name = payload.full_name.trim();
    if full_name.is_empty() {
        return Err(error_response(AppError::Validation(
            "Full name is required".to_string(),
        )));
    }
    validate_password_strength(&payload.password).map_err(error_response)?;
    let password_hash = hash_password(&payload.password).map_err(error_response)?;

    let user = User {
        id: UserId::new(),
        role: UserRole::for_registration(state.admin.is_admin_email(&email)),
        email,
        password_hash,
        full_name: full_name.to_string(),
        is_active: true,
        created_at: Utc::now(),
    };

    let user = UserRepository::new(state.db.clone())
        .create(user)
        .await
        .map_err(error_response)?;

    info!(user_id = %user.id, role = %user.role, "User registered");

    let response = login_response(&state, &user)?;
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// POST /auth/login - Authenticate user and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult {
    let user_repo = UserRepository::new(state.db.clone());

    let Some(user) = user_repo
        .find_by_email(&payload.email)
        .await
        .map_err(error_response)?
    else {
        info!(email = %payload.email, "Login attempt for non-existent user");
        return Err(invalid_credentials());
    };

    if !user.is_active {
        return Err(account_disabled());
    }

    if !verify_password(&payload.password, &user.password_hash).map_err(error_response)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(invalid_credentials());
    }

    info!(user_id = %user.id, "User logged in successfully");

    let response = login_response(&state, &user)?;
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// POST /auth/refresh - Exchange a refresh token for a new pair.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult {
    let claims = state
        .jwt_service
        .validate_kind(&payload.refresh_token, TokenKind::Refresh)
        .map_err(|_| {
            reject(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid or expired refresh token",
            )
        })?;

    let user = UserRepository::new(state.db.clone())
        .find_by_id(claims.user_id())
        .await
        .map_err(error_response)?
        .filter(|u| u.is_active)
        .ok_or_else(account_disabled)?;

    let pair = state
        .jwt_service
        .generate_pair(user.id.into_inner(), &user.role.to_string())
        .map_err(error_response)?;

    info!(user_id = %user.id, "Tokens refreshed");

    Ok((StatusCode::OK, Json(pair)).into_response())
}
