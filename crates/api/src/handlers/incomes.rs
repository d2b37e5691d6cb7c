//! Handlers for the `/incomes` ledger.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parish_core::permissions::{IncomesManage, IncomesView};
use parish_core::types::DbId;
use parish_core::validation::{require_positive, validate_date_range, validate_dto};
use parish_db::models::income::{CreateIncome, LedgerListParams, UpdateIncome};
use parish_db::repositories::IncomeRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequirePermission;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/incomes
///
/// Newest first. Filters: `from`/`to`, `search` on the source.
pub async fn list_incomes(
    RequirePermission(ctx, _): RequirePermission<IncomesView>,
    State(state): State<AppState>,
    Query(params): Query<LedgerListParams>,
) -> AppResult<impl IntoResponse> {
    validate_date_range(params.from, params.to)?;
    let org_id = ctx.organization_id()?;
    let items = IncomeRepo::list(&state.pool, org_id, &params).await?;
    let total = IncomeRepo::count(&state.pool, org_id, &params).await?;

    Ok(Json(DataResponse::page(items, total)))
}

/// GET /api/v1/incomes/{id}
pub async fn get_income(
    RequirePermission(ctx, _): RequirePermission<IncomesView>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let income = IncomeRepo::find_by_id(&state.pool, ctx.organization_id()?, id)
        .await?
        .ok_or(AppError::not_found("Income", id))?;

    Ok(Json(DataResponse { data: income }))
}

/// POST /api/v1/incomes
pub async fn create_income(
    RequirePermission(ctx, _): RequirePermission<IncomesManage>,
    State(state): State<AppState>,
    Json(input): Json<CreateIncome>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    require_positive(input.amount, "amount")?;

    let org_id = ctx.organization_id()?;
    let income = IncomeRepo::create(&state.pool, org_id, &input).await?;

    tracing::info!(income_id = income.id, organization_id = org_id, "Income recorded");

    Ok((StatusCode::CREATED, Json(DataResponse { data: income })))
}

/// PUT /api/v1/incomes/{id}
pub async fn update_income(
    RequirePermission(ctx, _): RequirePermission<IncomesManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateIncome>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    if let Some(amount) = input.amount {
        require_positive(amount, "amount")?;
    }

    let org_id = ctx.organization_id()?;
    let income = IncomeRepo::update(&state.pool, org_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Income", id))?;

    tracing::info!(income_id = id, organization_id = org_id, "Income updated");

    Ok(Json(DataResponse { data: income }))
}

/// DELETE /api/v1/incomes/{id}
pub async fn delete_income(
    RequirePermission(ctx, _): RequirePermission<IncomesManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    if !IncomeRepo::delete(&state.pool, org_id, id).await? {
        return Err(AppError::not_found("Income", id));
    }

    tracing::info!(income_id = id, organization_id = org_id, "Income deleted");

    Ok(StatusCode::NO_CONTENT)
}
