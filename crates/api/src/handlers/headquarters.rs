//! Handlers for `/headquarters`: a headquarters managing its child
//! organizations. Headquarters tokens only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parish_core::types::DbId;
use parish_core::validation::validate_dto;
use parish_db::models::organization::{AccountResponse, RegisterAccount, UpdateAccount};
use parish_db::repositories::{HeadquartersRepo, OrganizationRepo};

use super::auth::prepare_account;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireHeadquarters;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/headquarters
///
/// The calling headquarters' own profile.
pub async fn get_profile(
    RequireHeadquarters(ctx): RequireHeadquarters,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let hq = HeadquartersRepo::find_by_id(&state.pool, ctx.principal_id)
        .await?
        .ok_or(AppError::not_found("Headquarters", ctx.principal_id))?;

    Ok(Json(DataResponse {
        data: AccountResponse::from(&hq),
    }))
}

/// GET /api/v1/headquarters/organizations
pub async fn list_organizations(
    RequireHeadquarters(ctx): RequireHeadquarters,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let orgs = OrganizationRepo::list_for_headquarters(&state.pool, ctx.principal_id).await?;
    let items: Vec<AccountResponse> = orgs.iter().map(AccountResponse::from).collect();
    let total = items.len() as i64;

    Ok(Json(DataResponse::page(items, total)))
}

/// POST /api/v1/headquarters/organizations
///
/// Create a child organization with its own login and `admin` role.
pub async fn create_organization(
    RequireHeadquarters(ctx): RequireHeadquarters,
    State(state): State<AppState>,
    Json(input): Json<RegisterAccount>,
) -> AppResult<impl IntoResponse> {
    let account = prepare_account(&input)?;
    let org =
        OrganizationRepo::create_with_admin_role(&state.pool, Some(ctx.principal_id), &account)
            .await?;

    tracing::info!(
        organization_id = org.id,
        headquarters_id = ctx.principal_id,
        "Organization created by headquarters",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AccountResponse::from(&org),
        }),
    ))
}

/// GET /api/v1/headquarters/organizations/{id}
pub async fn get_organization(
    RequireHeadquarters(ctx): RequireHeadquarters,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let org = OrganizationRepo::find_owned_by(&state.pool, ctx.principal_id, id)
        .await?
        .ok_or(AppError::not_found("Organization", id))?;

    Ok(Json(DataResponse {
        data: AccountResponse::from(&org),
    }))
}

/// PUT /api/v1/headquarters/organizations/{id}
///
/// Update a child organization's profile or deactivate it.
pub async fn update_organization(
    RequireHeadquarters(ctx): RequireHeadquarters,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAccount>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    let org = OrganizationRepo::update_owned_by(&state.pool, ctx.principal_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Organization", id))?;

    tracing::info!(
        organization_id = id,
        headquarters_id = ctx.principal_id,
        "Organization updated by headquarters",
    );

    Ok(Json(DataResponse {
        data: AccountResponse::from(&org),
    }))
}
