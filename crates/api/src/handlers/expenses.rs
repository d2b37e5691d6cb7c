//! Handlers for the `/expenses` ledger.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parish_core::permissions::{ExpensesManage, ExpensesView};
use parish_core::types::DbId;
use parish_core::validation::{require_positive, validate_date_range, validate_dto};
use parish_db::models::expense::{CreateExpense, UpdateExpense};
use parish_db::models::income::LedgerListParams;
use parish_db::repositories::ExpenseRepo;

use super::departments::ensure_department;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequirePermission;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/expenses
///
/// Newest first. Filters: `from`/`to`, `search` on the category.
pub async fn list_expenses(
    RequirePermission(ctx, _): RequirePermission<ExpensesView>,
    State(state): State<AppState>,
    Query(params): Query<LedgerListParams>,
) -> AppResult<impl IntoResponse> {
    validate_date_range(params.from, params.to)?;
    let org_id = ctx.organization_id()?;
    let items = ExpenseRepo::list(&state.pool, org_id, &params).await?;
    let total = ExpenseRepo::count(&state.pool, org_id, &params).await?;

    Ok(Json(DataResponse::page(items, total)))
}

/// GET /api/v1/expenses/{id}
pub async fn get_expense(
    RequirePermission(ctx, _): RequirePermission<ExpensesView>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let expense = ExpenseRepo::find_by_id(&state.pool, ctx.organization_id()?, id)
        .await?
        .ok_or(AppError::not_found("Expense", id))?;

    Ok(Json(DataResponse { data: expense }))
}

/// POST /api/v1/expenses
pub async fn create_expense(
    RequirePermission(ctx, _): RequirePermission<ExpensesManage>,
    State(state): State<AppState>,
    Json(input): Json<CreateExpense>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    require_positive(input.amount, "amount")?;

    let org_id = ctx.organization_id()?;
    ensure_department(&state, org_id, input.department_id).await?;

    let expense = ExpenseRepo::create(&state.pool, org_id, &input).await?;

    tracing::info!(expense_id = expense.id, organization_id = org_id, "Expense recorded");

    Ok((StatusCode::CREATED, Json(DataResponse { data: expense })))
}

/// PUT /api/v1/expenses/{id}
pub async fn update_expense(
    RequirePermission(ctx, _): RequirePermission<ExpensesManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateExpense>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    if let Some(amount) = input.amount {
        require_positive(amount, "amount")?;
    }

    let org_id = ctx.organization_id()?;
    ensure_department(&state, org_id, input.department_id).await?;

    let expense = ExpenseRepo::update(&state.pool, org_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Expense", id))?;

    tracing::info!(expense_id = id, organization_id = org_id, "Expense updated");

    Ok(Json(DataResponse { data: expense }))
}

/// DELETE /api/v1/expenses/{id}
pub async fn delete_expense(
    RequirePermission(ctx, _): RequirePermission<ExpensesManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    if !ExpenseRepo::delete(&state.pool, org_id, id).await? {
        return Err(AppError::not_found("Expense", id));
    }

    tracing::info!(expense_id = id, organization_id = org_id, "Expense deleted");

    Ok(StatusCode::NO_CONTENT)
}
