//! Handlers for the `/departments` resource.
//!
//! Every query is scoped to the caller's organization, so a foreign
//! tenant's id behaves exactly like a missing one.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parish_core::error::CoreError;
use parish_core::permissions::{DepartmentsManage, DepartmentsView};
use parish_core::types::DbId;
use parish_core::validation::validate_dto;
use parish_db::models::department::{CreateDepartment, DepartmentListParams, UpdateDepartment};
use parish_db::repositories::DepartmentRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequirePermission;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/departments
///
/// Paginated list, optionally filtered by `search` on the name.
pub async fn list_departments(
    RequirePermission(ctx, _): RequirePermission<DepartmentsView>,
    State(state): State<AppState>,
    Query(params): Query<DepartmentListParams>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    let items = DepartmentRepo::list(&state.pool, org_id, &params).await?;
    let total = DepartmentRepo::count(&state.pool, org_id, &params).await?;

    Ok(Json(DataResponse::page(items, total)))
}

/// GET /api/v1/departments/{id}
pub async fn get_department(
    RequirePermission(ctx, _): RequirePermission<DepartmentsView>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let department = DepartmentRepo::find_by_id(&state.pool, ctx.organization_id()?, id)
        .await?
        .ok_or(AppError::not_found("Department", id))?;

    Ok(Json(DataResponse { data: department }))
}

/// POST /api/v1/departments
pub async fn create_department(
    RequirePermission(ctx, _): RequirePermission<DepartmentsManage>,
    State(state): State<AppState>,
    Json(input): Json<CreateDepartment>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    let org_id = ctx.organization_id()?;
    let department = DepartmentRepo::create(&state.pool, org_id, &input).await?;

    tracing::info!(
        department_id = department.id,
        organization_id = org_id,
        "Department created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: department })))
}

/// PUT /api/v1/departments/{id}
///
/// Partial update; absent fields keep their current values.
pub async fn update_department(
    RequirePermission(ctx, _): RequirePermission<DepartmentsManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDepartment>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    let org_id = ctx.organization_id()?;
    let department = DepartmentRepo::update(&state.pool, org_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Department", id))?;

    tracing::info!(department_id = id, organization_id = org_id, "Department updated");

    Ok(Json(DataResponse { data: department }))
}

/// DELETE /api/v1/departments/{id}
///
/// Staff, expenses and payroll rows that referenced it lose the link.
pub async fn delete_department(
    RequirePermission(ctx, _): RequirePermission<DepartmentsManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    if !DepartmentRepo::delete(&state.pool, org_id, id).await? {
        return Err(AppError::not_found("Department", id));
    }

    tracing::info!(department_id = id, organization_id = org_id, "Department deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Reject a `department_id` that is not part of the caller's organization.
pub(crate) async fn ensure_department(
    state: &AppState,
    organization_id: DbId,
    department_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(id) = department_id {
        DepartmentRepo::find_by_id(&state.pool, organization_id, id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!(
                    "department_id {id} does not exist"
                )))
            })?;
    }
    Ok(())
}
