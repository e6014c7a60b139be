//! Sharing routes: issue, redeem, list and revoke.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::sharing::{ShareGrant, SharingService};
use tally_db::ShareRepository;
use tally_shared::AppError;
use tally_shared::types::ShareGrantId;
use tracing::info;

use crate::AppState;
use crate::error::{ApiResult, error_response};
use crate::middleware::AuthUser;

/// Creates the sharing routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shares", get(list_shares))
        .route("/shares/tokens", post(issue_token))
        .route("/shares/redeem", post(redeem_token))
        .route("/shares/{grant_id}", delete(revoke_grant))
}

/// Response for a freshly issued token. The raw token is only shown once.
#[derive(Debug, Serialize)]
pub struct IssuedTokenResponse {
    /// Raw token to hand to the viewer.
    pub token: String,
    /// Redeemable until this instant.
    pub expires_at: DateTime<Utc>,
}

/// Request body for redeeming a token.
#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    /// Raw token.
    pub token: String,
}

/// The caller's grants, split by direction.
#[derive(Debug, Serialize)]
pub struct SharesResponse {
    /// Grants where the caller shares their data.
    pub granted: Vec<ShareGrant>,
    /// Grants where the caller views someone else's data.
    pub received: Vec<ShareGrant>,
}

/// GET /shares - List grants given and received.
async fn list_shares(State(state): State<AppState>, auth: AuthUser) -> ApiResult {
    let me = auth.user_id();
    let (granted, received): (Vec<ShareGrant>, Vec<ShareGrant>) =
        ShareRepository::new(state.db.clone())
            .grants_involving(me)
            .await
            .map_err(error_response)?
            .into_iter()
            .partition(|g| g.owner_id == me);
    Ok(Json(SharesResponse { granted, received }).into_response())
}

/// POST /shares/tokens - Issue a share token.
async fn issue_token(State(state): State<AppState>, auth: AuthUser) -> ApiResult {
    let (token, raw) =
        SharingService::issue(auth.user_id(), state.sharing.token_ttl_hours, Utc::now());
    let token = ShareRepository::new(state.db.clone())
        .insert_token(token)
        .await
        .map_err(error_response)?;

    info!(token_id = %token.id, "Share token issued");
    Ok((
        StatusCode::CREATED,
        Json(IssuedTokenResponse {
            token: raw,
            expires_at: token.expires_at,
        }),
    )
        .into_response())
}

/// POST /shares/redeem - Redeem a token for read-only access.
async fn redeem_token(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RedeemRequest>,
) -> ApiResult {
    let repo = ShareRepository::new(state.db.clone());
    let hash = SharingService::hash_token(payload.token.trim());
    let grant = repo
        .modify_token_by_hash(&hash, |token| {
            SharingService::redeem(token, auth.user_id(), Utc::now()).map_err(AppError::from)
        })
        .await
        .map_err(error_response)?;
    let grant = repo.upsert_grant(grant).await.map_err(error_response)?;

    info!(grant_id = %grant.id, owner_id = %grant.owner_id, "Share token redeemed");
    Ok((StatusCode::CREATED, Json(grant)).into_response())
}

/// DELETE /shares/{grant_id} - Revoke a grant the caller gave.
async fn revoke_grant(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(grant_id): Path<ShareGrantId>,
) -> ApiResult {
    ShareRepository::new(state.db.clone())
        .delete_grant(auth.user_id(), grant_id)
        .await
        .map_err(error_response)?;

    info!(grant_id = %grant_id, "Share grant revoked");
    Ok(StatusCode::NO_CONTENT.into_response())
}
