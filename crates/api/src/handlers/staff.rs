//! Handlers for the `/staff` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parish_core::error::CoreError;
use parish_core::permissions::{StaffManage, StaffView};
use parish_core::status::{validate_optional_status, PERSON_STATUSES};
use parish_core::types::DbId;
use parish_core::validation::{require_non_negative, validate_dto};
use parish_db::models::staff::{CreateStaff, StaffListParams, UpdateStaff};
use parish_db::repositories::{RoleRepo, StaffRepo};

use super::departments::ensure_department;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequirePermission;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/staff
///
/// Filters: `department_id`, `status`, `search` (first or last name).
pub async fn list_staff(
    RequirePermission(ctx, _): RequirePermission<StaffView>,
    State(state): State<AppState>,
    Query(params): Query<StaffListParams>,
) -> AppResult<impl IntoResponse> {
    validate_optional_status(params.status.as_deref(), PERSON_STATUSES, "status")?;
    let org_id = ctx.organization_id()?;
    let items = StaffRepo::list(&state.pool, org_id, &params).await?;
    let total = StaffRepo::count(&state.pool, org_id, &params).await?;

    Ok(Json(DataResponse::page(items, total)))
}

/// GET /api/v1/staff/{id}
pub async fn get_staff(
    RequirePermission(ctx, _): RequirePermission<StaffView>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let staff = StaffRepo::find_by_id(&state.pool, ctx.organization_id()?, id)
        .await?
        .ok_or(AppError::not_found("Staff", id))?;

    Ok(Json(DataResponse { data: staff }))
}

/// POST /api/v1/staff
pub async fn create_staff(
    RequirePermission(ctx, _): RequirePermission<StaffManage>,
    State(state): State<AppState>,
    Json(input): Json<CreateStaff>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    validate_optional_status(input.status.as_deref(), PERSON_STATUSES, "status")?;
    require_non_negative(input.basic_salary, "basic_salary")?;

    let org_id = ctx.organization_id()?;
    ensure_department(&state, org_id, input.department_id).await?;
    ensure_role(&state, org_id, input.role_id).await?;

    let staff = StaffRepo::create(&state.pool, org_id, &input).await?;

    tracing::info!(staff_id = staff.id, organization_id = org_id, "Staff created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: staff })))
}

/// PUT /api/v1/staff/{id}
pub async fn update_staff(
    RequirePermission(ctx, _): RequirePermission<StaffManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStaff>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    validate_optional_status(input.status.as_deref(), PERSON_STATUSES, "status")?;
    if let Some(salary) = input.basic_salary {
        require_non_negative(salary, "basic_salary")?;
    }

    let org_id = ctx.organization_id()?;
    ensure_department(&state, org_id, input.department_id).await?;
    ensure_role(&state, org_id, input.role_id).await?;

    let staff = StaffRepo::update(&state.pool, org_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Staff", id))?;

    tracing::info!(staff_id = id, organization_id = org_id, "Staff updated");

    Ok(Json(DataResponse { data: staff }))
}

/// DELETE /api/v1/staff/{id}
///
/// Staff with payroll history cannot be deleted (409); set them
/// `Inactive` instead.
pub async fn delete_staff(
    RequirePermission(ctx, _): RequirePermission<StaffManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    if !StaffRepo::delete(&state.pool, org_id, id).await? {
        return Err(AppError::not_found("Staff", id));
    }

    tracing::info!(staff_id = id, organization_id = org_id, "Staff deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_role(state: &AppState, organization_id: DbId, role_id: Option<DbId>) -> AppResult<()> {
    if let Some(id) = role_id {
        RoleRepo::find_by_id(&state.pool, organization_id, id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!("role_id {id} does not exist")))
            })?;
    }
    Ok(())
}
