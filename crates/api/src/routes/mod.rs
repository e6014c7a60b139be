//! API route definitions.

use axum::{Router, middleware, response::Response};
use tally_core::sharing::SharingService;
use tally_db::ShareRepository;
use tally_shared::types::UserId;

use crate::error::error_response;
use crate::middleware::{AuthUser, auth_middleware};
use crate::AppState;

pub mod admin;
pub mod auth;
pub mod collaborators;
pub mod dashboard;
pub mod expenses;
pub mod health;
pub mod preferences;
pub mod shares;

/// Creates the API router with public and protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(collaborators::routes())
        .merge(expenses::routes())
        .merge(dashboard::routes())
        .merge(preferences::routes())
        .merge(shares::routes())
        .merge(admin::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Whose data a read request addresses: the caller's, or an owner who shared
/// with the caller.
pub(crate) async fn resolve_owner(
    state: &AppState,
    auth: &AuthUser,
    owner_id: Option<UserId>,
) -> Result<UserId, Response> {
    let requester = auth.user_id();
    if owner_id.is_none_or(|owner| owner == requester) {
        return Ok(requester);
    }
    let grants = ShareRepository::new(state.db.clone())
        .grants_for_viewer(requester)
        .await
        .map_err(error_response)?;
    SharingService::resolve_reader(requester, owner_id, &grants).map_err(error_response)
}
