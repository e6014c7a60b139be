//! View preference routes.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use tally_core::dashboard::ViewPreferences;
use tally_db::PreferencesRepository;
use tracing::info;

use crate::AppState;
use crate::error::{ApiResult, error_response};
use crate::middleware::AuthUser;

/// Creates the preference routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/preferences", get(get_preferences).put(put_preferences))
}

/// GET /preferences - The caller's view preferences.
async fn get_preferences(State(state): State<AppState>, auth: AuthUser) -> ApiResult {
    let preferences = PreferencesRepository::new(state.db.clone())
        .get(auth.user_id())
        .await
        .map_err(error_response)?;
    Ok(Json(preferences).into_response())
}

/// PUT /preferences - Replace the caller's view preferences.
async fn put_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ViewPreferences>,
) -> ApiResult {
    let preferences = PreferencesRepository::new(state.db.clone())
        .put(auth.user_id(), payload)
        .await
        .map_err(error_response)?;

    info!(user_id = %auth.user_id(), "Preferences updated");
    Ok(Json(preferences).into_response())
}
