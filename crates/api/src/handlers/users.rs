//! Handlers for the `/users` resource (staff logins of an organization).
//!
//! Every mutation appends an audit-log entry in the same transaction.
//!
//! A user token may only grant roles it could have granted itself: never
//! `admin`, and never a role holding a permission the caller lacks. The same
//! bound applies to the accounts it edits, resets or deletes, and no user can
//! change their own role. Organization and headquarters tokens are unbounded.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parish_core::error::CoreError;
use parish_core::permissions::{UsersManage, UsersView};
use parish_core::principal::PrincipalKind;
use parish_core::roles::ROLE_ADMIN;
use parish_core::types::DbId;
use parish_core::validation::{normalize_email, validate_dto};
use parish_db::models::role::Role;
use parish_db::models::user::{CreateUser, CreateUserRequest, ResetPassword, UpdateUser};
use parish_db::repositories::{RoleRepo, UserRepo};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::auth::MIN_PASSWORD_LENGTH;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthContext;
use crate::middleware::rbac::RequirePermission;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users
pub async fn list_users(
    RequirePermission(ctx, _): RequirePermission<UsersView>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let items = UserRepo::list(&state.pool, ctx.organization_id()?).await?;
    let total = items.len() as i64;

    Ok(Json(DataResponse::page(items, total)))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    RequirePermission(ctx, _): RequirePermission<UsersView>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_response(&state.pool, ctx.organization_id()?, id)
        .await?
        .ok_or(AppError::not_found("User", id))?;

    Ok(Json(DataResponse { data: user }))
}

/// POST /api/v1/users
pub async fn create_user(
    RequirePermission(ctx, _): RequirePermission<UsersManage>,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    check_password(&input.password)?;

    let org_id = ctx.organization_id()?;
    let role = find_role(&state, org_id, input.role_id).await?;
    ensure_assignable(&state, &ctx, &role).await?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let created = UserRepo::create(
        &state.pool,
        &CreateUser {
            organization_id: org_id,
            role_id: role.id,
            full_name: input.full_name.trim().to_string(),
            email: normalize_email(&input.email),
            password_hash,
        },
        ctx.actor(),
    )
    .await?;

    tracing::info!(user_id = created.id, organization_id = org_id, "User created");

    let user = UserRepo::find_response(&state.pool, org_id, created.id)
        .await?
        .ok_or(AppError::not_found("User", created.id))?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// PUT /api/v1/users/{id}
pub async fn update_user(
    RequirePermission(ctx, _): RequirePermission<UsersManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    let org_id = ctx.organization_id()?;
    if ctx.user_id != Some(id) {
        ensure_manageable(&state, &ctx, org_id, id).await?;
    }
    if let Some(role_id) = input.role_id {
        if ctx.user_id == Some(id) {
            return Err(AppError::Core(CoreError::Forbidden(
                "You cannot change your own role".into(),
            )));
        }
        let role = find_role(&state, org_id, role_id).await?;
        ensure_assignable(&state, &ctx, &role).await?;
    }

    let input = UpdateUser {
        full_name: input.full_name.map(|n| n.trim().to_string()),
        email: input.email.as_deref().map(normalize_email),
        ..input
    };
    if !UserRepo::update(&state.pool, org_id, id, &input, ctx.actor()).await? {
        return Err(AppError::not_found("User", id));
    }
    tracing::info!(user_id = id, organization_id = org_id, "User updated");

    let user = UserRepo::find_response(&state.pool, org_id, id)
        .await?
        .ok_or(AppError::not_found("User", id))?;

    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/v1/users/{id}
///
/// A user cannot delete their own account.
pub async fn delete_user(
    RequirePermission(ctx, _): RequirePermission<UsersManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if ctx.user_id == Some(id) {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot delete your own account".into(),
        )));
    }

    let org_id = ctx.organization_id()?;
    ensure_manageable(&state, &ctx, org_id, id).await?;
    if !UserRepo::delete(&state.pool, org_id, id, ctx.actor()).await? {
        return Err(AppError::not_found("User", id));
    }

    tracing::info!(user_id = id, organization_id = org_id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/users/{id}/reset-password
///
/// Set a new password and clear any lockout.
pub async fn reset_password(
    RequirePermission(ctx, _): RequirePermission<UsersManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPassword>,
) -> AppResult<impl IntoResponse> {
    check_password(&input.new_password)?;

    let org_id = ctx.organization_id()?;
    if ctx.user_id != Some(id) {
        ensure_manageable(&state, &ctx, org_id, id).await?;
    }
    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    if !UserRepo::update_password(&state.pool, org_id, id, &password_hash, ctx.actor()).await? {
        return Err(AppError::not_found("User", id));
    }

    tracing::info!(user_id = id, organization_id = org_id, "User password reset");

    Ok(StatusCode::NO_CONTENT)
}

fn check_password(password: &str) -> AppResult<()> {
    validate_password_strength(password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))
}

async fn find_role(state: &AppState, organization_id: DbId, role_id: DbId) -> AppResult<Role> {
    RoleRepo::find_by_id(&state.pool, organization_id, role_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "role_id {role_id} does not exist"
            )))
        })
}

/// Whether a user token could have granted `role` itself.
async fn within_caller(state: &AppState, ctx: &AuthContext, role: &Role) -> AppResult<bool> {
    if ctx.kind != PrincipalKind::User {
        return Ok(true);
    }
    if role.name == ROLE_ADMIN {
        return Ok(false);
    }
    let granted = RoleRepo::permission_names(&state.pool, role.id).await?;
    Ok(granted.iter().all(|p| ctx.has_permission(p)))
}

async fn ensure_assignable(state: &AppState, ctx: &AuthContext, role: &Role) -> AppResult<()> {
    if within_caller(state, ctx, role).await? {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Forbidden(format!(
        "Role '{}' grants more than your own permissions",
        role.name
    ))))
}

/// Reject user tokens acting on an account whose role exceeds their own.
async fn ensure_manageable(
    state: &AppState,
    ctx: &AuthContext,
    organization_id: DbId,
    user_id: DbId,
) -> AppResult<()> {
    if ctx.kind != PrincipalKind::User {
        return Ok(());
    }
    let target = UserRepo::find_response(&state.pool, organization_id, user_id)
        .await?
        .ok_or(AppError::not_found("User", user_id))?;
    let role = find_role(state, organization_id, target.role_id).await?;
    if within_caller(state, ctx, &role).await? {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Forbidden(
        "You cannot manage an account with more permissions than your own".into(),
    )))
}
