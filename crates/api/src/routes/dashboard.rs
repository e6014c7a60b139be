//! Dashboard routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tally_core::calendar::Period;
use tally_core::dashboard::DashboardService;
use tally_db::{CollaboratorRepository, ExpenseRepository, PreferencesRepository};
use tally_shared::AppError;
use tally_shared::types::UserId;

use crate::AppState;
use crate::error::{ApiResult, error_response};
use crate::middleware::AuthUser;
use crate::routes::resolve_owner;

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/monthly", get(monthly_summary))
        .route("/dashboard/yearly", get(year_overview))
}

/// Query for the monthly summary.
#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    /// Defaults to the current year.
    pub year: Option<i32>,
    /// Defaults to the current month.
    pub month: Option<u32>,
    /// Owner who shared their data; defaults to the caller.
    pub owner_id: Option<UserId>,
}

/// Query for the year overview.
#[derive(Debug, Deserialize)]
pub struct YearlyQuery {
    /// Defaults to the current year.
    pub year: Option<i32>,
    /// Owner who shared their data; defaults to the caller.
    pub owner_id: Option<UserId>,
}

/// GET /dashboard/monthly - Per-collaborator summary for one month.
///
/// The caller's own view preferences apply, also when reading shared data.
async fn monthly_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MonthlyQuery>,
) -> ApiResult {
    let current = Period::current();
    let period = Period::new(
        query.year.unwrap_or(current.year),
        query.month.unwrap_or(current.month),
    )
    .map_err(|e| error_response(AppError::Validation(e.to_string())))?;
    let owner_id = resolve_owner(&state, &auth, query.owner_id).await?;

    let records = ExpenseRepository::new(state.db.clone())
        .list_by_owner(owner_id)
        .await
        .map_err(error_response)?;
    let collaborators = CollaboratorRepository::new(state.db.clone())
        .list_by_owner(owner_id)
        .await
        .map_err(error_response)?;
    let preferences = PreferencesRepository::new(state.db.clone())
        .get(auth.user_id())
        .await
        .map_err(error_response)?;

    let summary =
        DashboardService::monthly_summary(&records, &collaborators, period, &preferences);
    Ok(Json(summary).into_response())
}

/// GET /dashboard/yearly - Twelve months of totals.
async fn year_overview(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<YearlyQuery>,
) -> ApiResult {
    let year = query.year.unwrap_or_else(|| Period::current().year);
    if year == 0 {
        return Err(error_response(AppError::Validation(
            "Year must not be zero".to_string(),
        )));
    }
    let owner_id = resolve_owner(&state, &auth, query.owner_id).await?;

    let records = ExpenseRepository::new(state.db.clone())
        .list_by_owner(owner_id)
        .await
        .map_err(error_response)?;

    Ok(Json(DashboardService::year_overview(&records, year)).into_response())
}
