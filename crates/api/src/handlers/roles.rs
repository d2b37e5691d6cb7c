//! Handlers for roles and the permission catalogue.
//!
//! Role CRUD needs `roles.*` permissions. Replacing a role's permission set
//! is reserved for organization and headquarters tokens, so a user can
//! never widen a role's grants, its own included.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parish_core::error::CoreError;
use parish_core::permissions::{unknown_permissions, RolesManage, RolesView};
use parish_core::roles::ROLE_ADMIN;
use parish_core::types::DbId;
use parish_core::validation::validate_dto;
use parish_db::models::role::{CreateRole, RoleWithPermissions, SetRolePermissions, UpdateRole};
use parish_db::repositories::RoleRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireOrganizationOwner, RequirePermission};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/roles
pub async fn list_roles(
    RequirePermission(ctx, _): RequirePermission<RolesView>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let items = RoleRepo::list(&state.pool, ctx.organization_id()?).await?;
    let total = items.len() as i64;

    Ok(Json(DataResponse::page(items, total)))
}

/// GET /api/v1/roles/{id}
///
/// The role together with its granted permission names.
pub async fn get_role(
    RequirePermission(ctx, _): RequirePermission<RolesView>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let role = RoleRepo::find_by_id(&state.pool, ctx.organization_id()?, id)
        .await?
        .ok_or(AppError::not_found("Role", id))?;
    let permissions = RoleRepo::permission_names(&state.pool, role.id).await?;

    Ok(Json(DataResponse {
        data: RoleWithPermissions { role, permissions },
    }))
}

/// POST /api/v1/roles
pub async fn create_role(
    RequirePermission(ctx, _): RequirePermission<RolesManage>,
    State(state): State<AppState>,
    Json(input): Json<CreateRole>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    reject_unknown(&input.permissions)?;
    // Only the owner account may hand out grants.
    if !input.permissions.is_empty() && ctx.user_id.is_some() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the organization account can assign permissions".into(),
        )));
    }

    let org_id = ctx.organization_id()?;
    let role = RoleRepo::create(&state.pool, org_id, &input).await?;
    let permissions = RoleRepo::permission_names(&state.pool, role.id).await?;

    tracing::info!(role_id = role.id, organization_id = org_id, "Role created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RoleWithPermissions { role, permissions },
        }),
    ))
}

/// PUT /api/v1/roles/{id}
///
/// The built-in `admin` role cannot be renamed.
pub async fn update_role(
    RequirePermission(ctx, _): RequirePermission<RolesManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRole>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    let org_id = ctx.organization_id()?;

    let current = RoleRepo::find_by_id(&state.pool, org_id, id)
        .await?
        .ok_or(AppError::not_found("Role", id))?;
    if current.name == ROLE_ADMIN && input.name.as_deref().is_some_and(|n| n != ROLE_ADMIN) {
        return Err(AppError::Core(CoreError::Conflict(
            "The admin role cannot be renamed".into(),
        )));
    }

    let role = RoleRepo::update(&state.pool, org_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Role", id))?;

    tracing::info!(role_id = id, organization_id = org_id, "Role updated");

    Ok(Json(DataResponse { data: role }))
}

/// DELETE /api/v1/roles/{id}
///
/// The `admin` role and roles still held by users cannot be deleted (409).
pub async fn delete_role(
    RequirePermission(ctx, _): RequirePermission<RolesManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    let role = RoleRepo::find_by_id(&state.pool, org_id, id)
        .await?
        .ok_or(AppError::not_found("Role", id))?;
    if role.name == ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Conflict(
            "The admin role cannot be deleted".into(),
        )));
    }

    if !RoleRepo::delete(&state.pool, org_id, id).await? {
        return Err(AppError::not_found("Role", id));
    }

    tracing::info!(role_id = id, organization_id = org_id, "Role deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/roles/{id}/permissions
///
/// Replace the role's permission set. Organization or headquarters token
/// only. Unknown permission names are a 400.
pub async fn set_role_permissions(
    RequireOrganizationOwner(ctx): RequireOrganizationOwner,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetRolePermissions>,
) -> AppResult<impl IntoResponse> {
    reject_unknown(&input.permissions)?;

    let org_id = ctx.organization_id()?;
    let permissions =
        RoleRepo::set_permissions(&state.pool, org_id, id, &input.permissions, ctx.actor())
            .await?
            .ok_or(AppError::not_found("Role", id))?;

    tracing::info!(
        role_id = id,
        organization_id = org_id,
        permission_count = permissions.len(),
        "Role permissions replaced",
    );

    Ok(Json(DataResponse { data: permissions }))
}

/// GET /api/v1/permissions
///
/// The global permission catalogue.
pub async fn list_permissions(
    RequirePermission(_ctx, _): RequirePermission<RolesView>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let permissions = RoleRepo::list_permissions(&state.pool).await?;

    Ok(Json(DataResponse { data: permissions }))
}

fn reject_unknown(requested: &[String]) -> AppResult<()> {
    let unknown = unknown_permissions(requested);
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "Unknown permissions: {}",
            unknown.join(", ")
        ))))
    }
}
