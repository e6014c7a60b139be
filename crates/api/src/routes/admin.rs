//! Administrator routes for user management.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, put},
};
use serde::Deserialize;
use tally_core::auth::UserRole;
use tally_db::UserRepository;
use tally_shared::AppError;
use tally_shared::auth::UserInfo;
use tally_shared::types::UserId;
use tracing::info;

use crate::AppState;
use crate::error::{ApiResult, error_response};
use crate::middleware::AuthUser;

/// Creates the admin routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/users/{user_id}", put(update_user))
}

/// Request body for updating a user.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// Enable or disable the account.
    pub is_active: Option<bool>,
    /// New role, `admin` or `user`.
    pub role: Option<String>,
}

fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Administrator role required".to_string()))
    }
}

/// GET /admin/users - List every account.
async fn list_users(State(state): State<AppState>, auth: AuthUser) -> ApiResult {
    require_admin(&auth).map_err(error_response)?;
    let users: Vec<UserInfo> = UserRepository::new(state.db.clone())
        .list()
        .await
        .map_err(error_response)?
        .iter()
        .map(|u| u.info())
        .collect();
    Ok(Json(users).into_response())
}

/// PUT /admin/users/{user_id} - Enable, disable or change the role of a user.
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<UserId>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult {
    require_admin(&auth).map_err(error_response)?;
    if user_id == auth.user_id() && payload.is_active == Some(false) {
        return Err(error_response(AppError::BusinessRule(
            "Administrators cannot disable their own account".to_string(),
        )));
    }
    let role = payload
        .role
        .as_deref()
        .map(str::parse::<UserRole>)
        .transpose()
        .map_err(|e| error_response(AppError::Validation(e)))?;

    let user = UserRepository::new(state.db.clone())
        .modify(user_id, |user| {
            if let Some(is_active) = payload.is_active {
                user.is_active = is_active;
            }
            if let Some(role) = role {
                user.role = role;
            }
            Ok::<_, AppError>(user.info())
        })
        .await
        .map_err(error_response)?;

    info!(
        admin_id = %auth.user_id(),
        user_id = %user.id,
        is_active = user.is_active,
        role = %user.role,
        "User updated by administrator"
    );
    Ok(Json(user).into_response())
}
