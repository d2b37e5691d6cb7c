//! Handlers for the `/members` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parish_core::permissions::{MembersManage, MembersView};
use parish_core::status::{validate_optional_status, PERSON_STATUSES};
use parish_core::types::DbId;
use parish_core::validation::validate_dto;
use parish_db::models::member::{CreateMember, MemberListParams, UpdateMember};
use parish_db::repositories::MemberRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequirePermission;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/members
pub async fn list_members(
    RequirePermission(ctx, _): RequirePermission<MembersView>,
    State(state): State<AppState>,
    Query(params): Query<MemberListParams>,
) -> AppResult<impl IntoResponse> {
    validate_optional_status(params.status.as_deref(), PERSON_STATUSES, "status")?;
    let org_id = ctx.organization_id()?;
    let items = MemberRepo::list(&state.pool, org_id, &params).await?;
    let total = MemberRepo::count(&state.pool, org_id, &params).await?;

    Ok(Json(DataResponse::page(items, total)))
}

/// GET /api/v1/members/{id}
pub async fn get_member(
    RequirePermission(ctx, _): RequirePermission<MembersView>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let member = MemberRepo::find_by_id(&state.pool, ctx.organization_id()?, id)
        .await?
        .ok_or(AppError::not_found("Member", id))?;

    Ok(Json(DataResponse { data: member }))
}

/// POST /api/v1/members
pub async fn create_member(
    RequirePermission(ctx, _): RequirePermission<MembersManage>,
    State(state): State<AppState>,
    Json(input): Json<CreateMember>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    validate_optional_status(input.status.as_deref(), PERSON_STATUSES, "status")?;

    let org_id = ctx.organization_id()?;
    let member = MemberRepo::create(&state.pool, org_id, &input).await?;

    tracing::info!(member_id = member.id, organization_id = org_id, "Member created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// PUT /api/v1/members/{id}
pub async fn update_member(
    RequirePermission(ctx, _): RequirePermission<MembersManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMember>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    validate_optional_status(input.status.as_deref(), PERSON_STATUSES, "status")?;

    let org_id = ctx.organization_id()?;
    let member = MemberRepo::update(&state.pool, org_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Member", id))?;

    tracing::info!(member_id = id, organization_id = org_id, "Member updated");

    Ok(Json(DataResponse { data: member }))
}

/// DELETE /api/v1/members/{id}
pub async fn delete_member(
    RequirePermission(ctx, _): RequirePermission<MembersManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    if !MemberRepo::delete(&state.pool, org_id, id).await? {
        return Err(AppError::not_found("Member", id));
    }

    tracing::info!(member_id = id, organization_id = org_id, "Member deleted");

    Ok(StatusCode::NO_CONTENT)
}
