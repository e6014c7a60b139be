//! Collaborator routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::Utc;
use serde::Deserialize;
use tally_core::collaborator::CollaboratorService;
use tally_db::{CollaboratorRepository, DbError};
use tally_shared::AppError;
use tally_shared::types::{CollaboratorId, UserId};
use tracing::info;

use crate::AppState;
use crate::error::{ApiResult, error_response};
use crate::middleware::AuthUser;
use crate::routes::resolve_owner;

/// Creates the collaborator routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/collaborators",
            get(list_collaborators).post(create_collaborator),
        )
        .route("/collaborators/order", put(reorder_collaborators))
        .route(
            "/collaborators/{collaborator_id}",
            put(rename_collaborator).delete(delete_collaborator),
        )
}

/// Query for reading another owner's collaborators.
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    /// Owner who shared their data; defaults to the caller.
    pub owner_id: Option<UserId>,
}

/// Request body for creating or renaming a collaborator.
#[derive(Debug, Deserialize)]
pub struct CollaboratorRequest {
    /// Display name.
    pub name: String,
}

/// Request body for reordering collaborators.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    /// Every collaborator id, in the desired order.
    pub ids: Vec<CollaboratorId>,
}

/// GET /collaborators - List collaborators in manual order.
async fn list_collaborators(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OwnerQuery>,
) -> ApiResult {
    let owner_id = resolve_owner(&state, &auth, query.owner_id).await?;
    let list = CollaboratorRepository::new(state.db.clone())
        .list_by_owner(owner_id)
        .await
        .map_err(error_response)?;
    Ok(Json(list).into_response())
}

/// POST /collaborators - Create a collaborator.
async fn create_collaborator(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CollaboratorRequest>,
) -> ApiResult {
    let owner_id = auth.user_id();
    let collaborator = CollaboratorRepository::new(state.db.clone())
        .modify_all(owner_id, |list| {
            let collaborator =
                CollaboratorService::create(owner_id, &payload.name, list, Utc::now())?;
            list.push(collaborator.clone());
            Ok::<_, AppError>(collaborator)
        })
        .await
        .map_err(error_response)?;

    info!(collaborator_id = %collaborator.id, "Collaborator created");
    Ok((StatusCode::CREATED, Json(collaborator)).into_response())
}

/// PUT /collaborators/{collaborator_id} - Rename a collaborator.
async fn rename_collaborator(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(collaborator_id): Path<CollaboratorId>,
    Json(payload): Json<CollaboratorRequest>,
) -> ApiResult {
    let collaborator = CollaboratorRepository::new(state.db.clone())
        .modify_all(auth.user_id(), |list| {
            let existing = list.clone();
            let collaborator = list
                .iter_mut()
                .find(|c| c.id == collaborator_id)
                .ok_or(DbError::NotFound("Collaborator"))?;
            CollaboratorService::rename(collaborator, &payload.name, &existing)?;
            Ok::<_, AppError>(collaborator.clone())
        })
        .await
        .map_err(error_response)?;

    info!(collaborator_id = %collaborator.id, "Collaborator renamed");
    Ok(Json(collaborator).into_response())
}

/// PUT /collaborators/order - Apply a manual ordering.
async fn reorder_collaborators(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ReorderRequest>,
) -> ApiResult {
    let list = CollaboratorRepository::new(state.db.clone())
        .modify_all(auth.user_id(), |list| {
            CollaboratorService::reorder(list, &payload.ids)?;
            Ok::<_, AppError>(list.clone())
        })
        .await
        .map_err(error_response)?;

    info!(count = list.len(), "Collaborators reordered");
    Ok(Json(list).into_response())
}

/// DELETE /collaborators/{collaborator_id} - Delete an unused collaborator.
async fn delete_collaborator(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(collaborator_id): Path<CollaboratorId>,
) -> ApiResult {
    CollaboratorRepository::new(state.db.clone())
        .delete_unused(auth.user_id(), collaborator_id, |in_use| {
            CollaboratorService::ensure_deletable(in_use).map_err(AppError::from)
        })
        .await
        .map_err(error_response)?;

    info!(collaborator_id = %collaborator_id, "Collaborator deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
