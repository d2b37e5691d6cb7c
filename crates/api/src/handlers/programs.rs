//! Handlers for the `/programs` resource (services, events, outreach).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parish_core::permissions::{ProgramsManage, ProgramsView};
use parish_core::status::{validate_optional_status, PROGRAM_STATUSES};
use parish_core::types::DbId;
use parish_core::validation::{validate_date_range, validate_dto};
use parish_db::models::program::{CreateProgram, ProgramListParams, UpdateProgram};
use parish_db::repositories::ProgramRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequirePermission;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/programs
pub async fn list_programs(
    RequirePermission(ctx, _): RequirePermission<ProgramsView>,
    State(state): State<AppState>,
    Query(params): Query<ProgramListParams>,
) -> AppResult<impl IntoResponse> {
    validate_optional_status(params.status.as_deref(), PROGRAM_STATUSES, "status")?;
    let org_id = ctx.organization_id()?;
    let items = ProgramRepo::list(&state.pool, org_id, &params).await?;
    let total = ProgramRepo::count(&state.pool, org_id, &params).await?;

    Ok(Json(DataResponse::page(items, total)))
}

/// GET /api/v1/programs/{id}
pub async fn get_program(
    RequirePermission(ctx, _): RequirePermission<ProgramsView>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let program = ProgramRepo::find_by_id(&state.pool, ctx.organization_id()?, id)
        .await?
        .ok_or(AppError::not_found("Program", id))?;

    Ok(Json(DataResponse { data: program }))
}

/// POST /api/v1/programs
pub async fn create_program(
    RequirePermission(ctx, _): RequirePermission<ProgramsManage>,
    State(state): State<AppState>,
    Json(input): Json<CreateProgram>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    validate_optional_status(input.status.as_deref(), PROGRAM_STATUSES, "status")?;
    validate_date_range(input.start_date, input.end_date)?;

    let org_id = ctx.organization_id()?;
    let program = ProgramRepo::create(&state.pool, org_id, &input).await?;

    tracing::info!(program_id = program.id, organization_id = org_id, "Program created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: program })))
}

/// PUT /api/v1/programs/{id}
///
/// The date range is checked against the merged record, so moving only the
/// end date before the stored start date is rejected.
pub async fn update_program(
    RequirePermission(ctx, _): RequirePermission<ProgramsManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProgram>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    validate_optional_status(input.status.as_deref(), PROGRAM_STATUSES, "status")?;

    let org_id = ctx.organization_id()?;
    let current = ProgramRepo::find_by_id(&state.pool, org_id, id)
        .await?
        .ok_or(AppError::not_found("Program", id))?;
    validate_date_range(
        input.start_date.or(current.start_date),
        input.end_date.or(current.end_date),
    )?;

    let program = ProgramRepo::update(&state.pool, org_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Program", id))?;

    tracing::info!(program_id = id, organization_id = org_id, "Program updated");

    Ok(Json(DataResponse { data: program }))
}

/// DELETE /api/v1/programs/{id}
pub async fn delete_program(
    RequirePermission(ctx, _): RequirePermission<ProgramsManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    if !ProgramRepo::delete(&state.pool, org_id, id).await? {
        return Err(AppError::not_found("Program", id));
    }

    tracing::info!(program_id = id, organization_id = org_id, "Program deleted");

    Ok(StatusCode::NO_CONTENT)
}
