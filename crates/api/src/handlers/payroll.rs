//! Handlers for the `/payroll` resource.
//!
//! Amounts are always recomputed server-side with the configured
//! [`PayrollRules`](parish_core::payroll::PayrollRules); totals sent by a
//! client are never stored. Every mutation is audit-logged by the
//! repository inside the same transaction.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parish_core::error::CoreError;
use parish_core::payroll::{compute_pay, validate_period, PayInputs};
use parish_core::permissions::{PayrollManage, PayrollView};
use parish_core::status::{validate_optional_status, validate_status, PAYROLL_STATUSES};
use parish_core::types::DbId;
use parish_db::models::payroll::{
    CreatePayrollRequest, GeneratePayroll, NewPayroll, PayrollListParams, UpdatePayroll,
    UpdatePayrollStatus,
};
use parish_db::repositories::{PayrollRepo, StaffRepo};

use crate::error::{locked_write, AppError, AppResult};
use crate::middleware::rbac::RequirePermission;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/payroll/preview
///
/// Compute a pay breakdown without persisting anything.
pub async fn preview_payroll(
    RequirePermission(_ctx, _): RequirePermission<PayrollView>,
    State(state): State<AppState>,
    Json(inputs): Json<PayInputs>,
) -> AppResult<impl IntoResponse> {
    let breakdown = compute_pay(&inputs, &state.config.payroll)?;

    Ok(Json(DataResponse { data: breakdown }))
}

/// GET /api/v1/payroll
///
/// Filters: `year`, `month`, `status`, `staff_id`, `department_id`.
pub async fn list_payroll(
    RequirePermission(ctx, _): RequirePermission<PayrollView>,
    State(state): State<AppState>,
    Query(params): Query<PayrollListParams>,
) -> AppResult<impl IntoResponse> {
    validate_optional_status(params.status.as_deref(), PAYROLL_STATUSES, "status")?;
    let org_id = ctx.organization_id()?;
    let items = PayrollRepo::list(&state.pool, org_id, &params).await?;
    let total = PayrollRepo::count(&state.pool, org_id, &params).await?;

    Ok(Json(DataResponse::page(items, total)))
}

/// GET /api/v1/payroll/{id}
pub async fn get_payroll(
    RequirePermission(ctx, _): RequirePermission<PayrollView>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let payroll = PayrollRepo::find_by_id(&state.pool, ctx.organization_id()?, id)
        .await?
        .ok_or(AppError::not_found("Payroll", id))?;

    Ok(Json(DataResponse { data: payroll }))
}

/// POST /api/v1/payroll
///
/// Department and role are copied from the staff record. The basic salary
/// defaults to the staff member's current salary. A second payroll for the
/// same staff member and period is a 409.
pub async fn create_payroll(
    RequirePermission(ctx, _): RequirePermission<PayrollManage>,
    State(state): State<AppState>,
    Json(input): Json<CreatePayrollRequest>,
) -> AppResult<impl IntoResponse> {
    validate_period(input.period_year, input.period_month)?;

    let org_id = ctx.organization_id()?;
    let staff = StaffRepo::find_by_id(&state.pool, org_id, input.staff_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "staff_id {} does not exist",
                input.staff_id
            )))
        })?;

    let inputs = PayInputs {
        basic_salary: input.basic_salary.unwrap_or(staff.basic_salary),
        housing_allowance: input.housing_allowance,
        transport_allowance: input.transport_allowance,
        other_allowances: input.other_allowances,
        other_deductions: input.other_deductions,
    };
    let breakdown = compute_pay(&inputs, &state.config.payroll)?;

    let new = NewPayroll {
        staff_id: staff.id,
        department_id: staff.department_id,
        role_id: staff.role_id,
        period_year: input.period_year,
        period_month: input.period_month,
        inputs,
        breakdown,
    };
    let payroll = PayrollRepo::create(&state.pool, org_id, &new, ctx.actor()).await?;

    tracing::info!(
        payroll_id = payroll.id,
        staff_id = payroll.staff_id,
        organization_id = org_id,
        period_year = payroll.period_year,
        period_month = payroll.period_month,
        "Payroll created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: payroll })))
}

/// PUT /api/v1/payroll/{id}
///
/// Overlay the supplied amounts on the stored ones and recompute. Paid
/// payrolls are frozen (409).
pub async fn update_payroll(
    RequirePermission(ctx, _): RequirePermission<PayrollManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePayroll>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    let rules = &state.config.payroll;

    let outcome = PayrollRepo::update(&state.pool, org_id, id, ctx.actor(), |current| {
        let inputs = input.apply_to(&current.inputs());
        let breakdown = compute_pay(&inputs, rules)?;
        Ok((inputs, breakdown))
    })
    .await?;
    let payroll = locked_write(outcome, "Payroll", id)?;

    tracing::info!(
        payroll_id = id,
        organization_id = org_id,
        net_pay = %payroll.net_pay,
        "Payroll updated",
    );

    Ok(Json(DataResponse { data: payroll }))
}

/// PATCH /api/v1/payroll/{id}/status
///
/// Switch between `Pending` and `Paid`; `paid_at` follows the status.
pub async fn update_payroll_status(
    RequirePermission(ctx, _): RequirePermission<PayrollManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePayrollStatus>,
) -> AppResult<impl IntoResponse> {
    validate_status(&input.status, PAYROLL_STATUSES, "status")?;

    let org_id = ctx.organization_id()?;
    let outcome =
        PayrollRepo::set_status(&state.pool, org_id, id, &input.status, ctx.actor()).await?;
    let payroll = locked_write(outcome, "Payroll", id)?;

    tracing::info!(
        payroll_id = id,
        organization_id = org_id,
        status = %payroll.status,
        "Payroll status changed",
    );

    Ok(Json(DataResponse { data: payroll }))
}

/// DELETE /api/v1/payroll/{id}
///
/// Only Pending payrolls can be deleted.
pub async fn delete_payroll(
    RequirePermission(ctx, _): RequirePermission<PayrollManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    let outcome = PayrollRepo::delete(&state.pool, org_id, id, ctx.actor()).await?;
    locked_write(outcome, "Payroll", id)?;

    tracing::info!(payroll_id = id, organization_id = org_id, "Payroll deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/payroll/generate
///
/// Create Pending payroll for every Active staff member without one for the
/// period. Returns only the rows created by this call.
pub async fn generate_payroll(
    RequirePermission(ctx, _): RequirePermission<PayrollManage>,
    State(state): State<AppState>,
    Json(input): Json<GeneratePayroll>,
) -> AppResult<impl IntoResponse> {
    validate_period(input.period_year, input.period_month)?;

    let org_id = ctx.organization_id()?;
    let outcome = PayrollRepo::generate_for_period(
        &state.pool,
        org_id,
        input.period_year,
        input.period_month,
        &state.config.payroll,
        ctx.actor(),
    )
    .await?;
    let created = locked_write(outcome, "Organization", org_id)?;

    tracing::info!(
        organization_id = org_id,
        period_year = input.period_year,
        period_month = input.period_month,
        created = created.len(),
        "Payroll generated",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}
