//! Expense record routes.

use std::collections::HashSet;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tally_core::calendar::Period;
use tally_core::dashboard::{DashboardService, ExpenseLine};
use tally_core::expense::{
    CreateExpenseInput, ExpenseRecord, ExpenseService, ExpenseStatus, StoredExpense,
    UpdateExpenseInput, is_visible,
};
use tally_db::{CollaboratorRepository, DbError, ExpenseRepository};
use tally_shared::AppError;
use tally_shared::types::{CollaboratorId, ExpenseId, UserId};
use tracing::info;

use crate::AppState;
use crate::error::{ApiResult, error_response};
use crate::middleware::AuthUser;
use crate::routes::resolve_owner;

/// Creates the expense routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/import", post(import_expenses))
        .route(
            "/expenses/{expense_id}",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
        .route("/expenses/{expense_id}/cancel", post(toggle_cancel))
        .route("/expenses/{expense_id}/payment", post(mark_paid))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query for listing records.
#[derive(Debug, Deserialize)]
pub struct ListExpensesQuery {
    /// With `month`, lists only the records visible in that month.
    pub year: Option<i32>,
    /// With `year`, lists only the records visible in that month.
    pub month: Option<u32>,
    /// Owner who shared their data; defaults to the caller.
    pub owner_id: Option<UserId>,
}

/// Query for reading a single record.
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    /// Owner who shared their data; defaults to the caller.
    pub owner_id: Option<UserId>,
}

/// A record as seen from one month.
#[derive(Debug, Serialize)]
pub struct PeriodExpense {
    /// Stored record.
    pub record: ExpenseRecord,
    /// Month-specific view.
    pub line: ExpenseLine,
}

/// Request body for creating a record.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Collaborator the record belongs to.
    pub collaborator_id: CollaboratorId,
    /// Free-text label.
    pub description: String,
    /// Amount per occurrence.
    pub value: Decimal,
    /// First month.
    pub start: Period,
    /// Omit for recurring; `0`/`1` one-off; `N` installments.
    #[serde(default)]
    pub installment_total: Option<i32>,
}

/// Request body for updating a record. Omitted fields stay as they are.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateExpenseRequest {
    /// New collaborator.
    pub collaborator_id: Option<CollaboratorId>,
    /// New description.
    pub description: Option<String>,
    /// New value.
    pub value: Option<Decimal>,
    /// New start month.
    pub start: Option<Period>,
    /// `null` makes the record recurring.
    #[serde(default, deserialize_with = "present")]
    pub installment_total: Option<Option<i32>>,
    /// New status.
    pub status: Option<ExpenseStatus>,
    /// Month a cancellation takes effect in; only valid when the record
    /// ends up cancelled.
    pub cancelled_in: Option<Period>,
}

/// Distinguishes an explicit `null` from an omitted field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request body for the cancel toggle.
#[derive(Debug, Default, Deserialize)]
pub struct CancelRequest {
    /// Month the cancellation takes effect in; defaults to the current month.
    #[serde(default)]
    pub at: Option<Period>,
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// Month the payment is for.
    pub period: Period,
    /// Paid or unpaid.
    pub paid: bool,
    /// Payment time; defaults to now.
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

/// Request body for importing stored documents.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    /// Documents in either stored shape.
    pub documents: Vec<StoredExpense>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /expenses - List records, optionally only those visible in a month.
async fn list_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListExpensesQuery>,
) -> ApiResult {
    let owner_id = resolve_owner(&state, &auth, query.owner_id).await?;
    let records = ExpenseRepository::new(state.db.clone())
        .list_by_owner(owner_id)
        .await
        .map_err(error_response)?;

    let (Some(year), Some(month)) = (query.year, query.month) else {
        return Ok(Json(records).into_response());
    };
    let period = Period::new(year, month)
        .map_err(|e| error_response(AppError::Validation(e.to_string())))?;

    let listed: Vec<PeriodExpense> = records
        .into_iter()
        .filter(|r| is_visible(r, period))
        .map(|record| PeriodExpense {
            line: DashboardService::expense_line(&record, period),
            record,
        })
        .collect();
    Ok(Json(listed).into_response())
}

/// POST /expenses - Create a record.
async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateExpenseRequest>,
) -> ApiResult {
    let record = ExpenseService::create(
        CreateExpenseInput {
            owner_id: auth.user_id(),
            collaborator_id: payload.collaborator_id,
            description: payload.description,
            value: payload.value,
            start: payload.start,
            installment_total: payload.installment_total,
        },
        Utc::now(),
    )
    .map_err(error_response)?;

    let record = ExpenseRepository::new(state.db.clone())
        .insert(record)
        .await
        .map_err(error_response)?;

    info!(expense_id = %record.id, "Expense created");
    Ok((StatusCode::CREATED, Json(record)).into_response())
}

/// POST /expenses/import - Store documents in either legacy shape.
async fn import_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ImportRequest>,
) -> ApiResult {
    let owner_id = auth.user_id();
    let owned: HashSet<CollaboratorId> = CollaboratorRepository::new(state.db.clone())
        .list_by_owner(owner_id)
        .await
        .map_err(error_response)?
        .into_iter()
        .map(|c| c.id)
        .collect();

    let now = Utc::now();
    let records = payload
        .documents
        .into_iter()
        .enumerate()
        .map(|(i, doc)| {
            if !owned.contains(&doc.collaborator_id()) {
                return Err(AppError::Validation(format!(
                    "Document {i}: collaborator not found: {}",
                    doc.collaborator_id()
                )));
            }
            doc.into_record(owner_id, now)
                .map_err(|e| AppError::Validation(format!("Document {i}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(error_response)?;

    let imported = ExpenseRepository::new(state.db.clone())
        .insert_many(records)
        .await
        .map_err(error_response)?;

    info!(imported, "Expenses imported");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "imported": imported })),
    )
        .into_response())
}

/// GET /expenses/{expense_id} - Fetch one record.
async fn get_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<ExpenseId>,
    Query(query): Query<OwnerQuery>,
) -> ApiResult {
    let owner_id = resolve_owner(&state, &auth, query.owner_id).await?;
    let record = ExpenseRepository::new(state.db.clone())
        .find(owner_id, expense_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(DbError::NotFound("Expense")))?;
    Ok(Json(record).into_response())
}

/// PUT /expenses/{expense_id} - Partially update a record.
async fn update_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<ExpenseId>,
    Json(payload): Json<UpdateExpenseRequest>,
) -> ApiResult {
    let input = UpdateExpenseInput {
        collaborator_id: payload.collaborator_id,
        description: payload.description,
        value: payload.value,
        start: payload.start,
        installment_total: payload.installment_total,
        status: payload.status,
        cancelled_in: payload.cancelled_in,
    };
    let apply = |record: &mut ExpenseRecord| {
        ExpenseService::update(record, input, Utc::now())?;
        Ok::<_, AppError>(record.clone())
    };
    let repo = ExpenseRepository::new(state.db.clone());
    let record = match payload.collaborator_id {
        Some(collaborator_id) => {
            repo.modify_assigned(auth.user_id(), expense_id, collaborator_id, apply)
                .await
        }
        None => repo.modify(auth.user_id(), expense_id, apply).await,
    }
    .map_err(error_response)?;

    info!(expense_id = %record.id, "Expense updated");
    Ok(Json(record).into_response())
}

/// DELETE /expenses/{expense_id} - Delete a record.
async fn delete_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<ExpenseId>,
) -> ApiResult {
    ExpenseRepository::new(state.db.clone())
        .delete(auth.user_id(), expense_id)
        .await
        .map_err(error_response)?;

    info!(expense_id = %expense_id, "Expense deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// POST /expenses/{expense_id}/cancel - Toggle between pending and cancelled.
async fn toggle_cancel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<ExpenseId>,
    Json(payload): Json<CancelRequest>,
) -> ApiResult {
    let record = ExpenseRepository::new(state.db.clone())
        .modify(auth.user_id(), expense_id, |record| {
            ExpenseService::toggle_cancel(record, payload.at, Utc::now())?;
            Ok::<_, AppError>(record.clone())
        })
        .await
        .map_err(error_response)?;

    info!(expense_id = %record.id, status = %record.status, "Expense cancellation toggled");
    Ok(Json(record).into_response())
}

/// POST /expenses/{expense_id}/payment - Mark a month paid or unpaid.
async fn mark_paid(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<ExpenseId>,
    Json(payload): Json<PaymentRequest>,
) -> ApiResult {
    let record = ExpenseRepository::new(state.db.clone())
        .modify(auth.user_id(), expense_id, |record| {
            ExpenseService::mark_paid(
                record,
                payload.period,
                payload.paid,
                payload.paid_at,
                Utc::now(),
            )?;
            Ok::<_, AppError>(record.clone())
        })
        .await
        .map_err(error_response)?;

    info!(
        expense_id = %record.id,
        period = %payload.period,
        paid = payload.paid,
        "Expense payment recorded"
    );
    Ok(Json(record).into_response())
}
