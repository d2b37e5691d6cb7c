//! Handlers for donors and donation purposes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parish_core::permissions::{DonorsManage, DonorsView};
use parish_core::types::DbId;
use parish_core::validation::validate_dto;
use parish_db::models::donor::{
    CreateDonationPurpose, CreateDonor, DonorListParams, UpdateDonationPurpose, UpdateDonor,
};
use parish_db::repositories::{DonationPurposeRepo, DonorRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequirePermission;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Donors
// ---------------------------------------------------------------------------

/// GET /api/v1/donors
pub async fn list_donors(
    RequirePermission(ctx, _): RequirePermission<DonorsView>,
    State(state): State<AppState>,
    Query(params): Query<DonorListParams>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    let items = DonorRepo::list(&state.pool, org_id, &params).await?;
    let total = DonorRepo::count(&state.pool, org_id, &params).await?;

    Ok(Json(DataResponse::page(items, total)))
}

/// GET /api/v1/donors/{id}
pub async fn get_donor(
    RequirePermission(ctx, _): RequirePermission<DonorsView>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let donor = DonorRepo::find_by_id(&state.pool, ctx.organization_id()?, id)
        .await?
        .ok_or(AppError::not_found("Donor", id))?;

    Ok(Json(DataResponse { data: donor }))
}

/// POST /api/v1/donors
pub async fn create_donor(
    RequirePermission(ctx, _): RequirePermission<DonorsManage>,
    State(state): State<AppState>,
    Json(input): Json<CreateDonor>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    let org_id = ctx.organization_id()?;
    let donor = DonorRepo::create(&state.pool, org_id, &input).await?;

    tracing::info!(donor_id = donor.id, organization_id = org_id, "Donor created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: donor })))
}

/// PUT /api/v1/donors/{id}
pub async fn update_donor(
    RequirePermission(ctx, _): RequirePermission<DonorsManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDonor>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    let org_id = ctx.organization_id()?;
    let donor = DonorRepo::update(&state.pool, org_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Donor", id))?;

    tracing::info!(donor_id = id, organization_id = org_id, "Donor updated");

    Ok(Json(DataResponse { data: donor }))
}

/// DELETE /api/v1/donors/{id}
///
/// A donor with recorded donations cannot be deleted (409).
pub async fn delete_donor(
    RequirePermission(ctx, _): RequirePermission<DonorsManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    if !DonorRepo::delete(&state.pool, org_id, id).await? {
        return Err(AppError::not_found("Donor", id));
    }

    tracing::info!(donor_id = id, organization_id = org_id, "Donor deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Donation purposes
// ---------------------------------------------------------------------------

/// GET /api/v1/donation-purposes
///
/// Purposes are a short lookup list, so this is not paginated.
pub async fn list_purposes(
    RequirePermission(ctx, _): RequirePermission<DonorsView>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let items = DonationPurposeRepo::list(&state.pool, ctx.organization_id()?).await?;
    let total = items.len() as i64;

    Ok(Json(DataResponse::page(items, total)))
}

/// GET /api/v1/donation-purposes/{id}
pub async fn get_purpose(
    RequirePermission(ctx, _): RequirePermission<DonorsView>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let purpose = DonationPurposeRepo::find_by_id(&state.pool, ctx.organization_id()?, id)
        .await?
        .ok_or(AppError::not_found("DonationPurpose", id))?;

    Ok(Json(DataResponse { data: purpose }))
}

/// POST /api/v1/donation-purposes
pub async fn create_purpose(
    RequirePermission(ctx, _): RequirePermission<DonorsManage>,
    State(state): State<AppState>,
    Json(input): Json<CreateDonationPurpose>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    let org_id = ctx.organization_id()?;
    let purpose = DonationPurposeRepo::create(&state.pool, org_id, &input).await?;

    tracing::info!(purpose_id = purpose.id, organization_id = org_id, "Donation purpose created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: purpose })))
}

/// PUT /api/v1/donation-purposes/{id}
pub async fn update_purpose(
    RequirePermission(ctx, _): RequirePermission<DonorsManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDonationPurpose>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    let org_id = ctx.organization_id()?;
    let purpose = DonationPurposeRepo::update(&state.pool, org_id, id, &input)
        .await?
        .ok_or(AppError::not_found("DonationPurpose", id))?;

    tracing::info!(purpose_id = id, organization_id = org_id, "Donation purpose updated");

    Ok(Json(DataResponse { data: purpose }))
}

/// DELETE /api/v1/donation-purposes/{id}
pub async fn delete_purpose(
    RequirePermission(ctx, _): RequirePermission<DonorsManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    if !DonationPurposeRepo::delete(&state.pool, org_id, id).await? {
        return Err(AppError::not_found("DonationPurpose", id));
    }

    tracing::info!(purpose_id = id, organization_id = org_id, "Donation purpose deleted");

    Ok(StatusCode::NO_CONTENT)
}
