//! Handlers for the `/donations` resource.
//!
//! A donation must reference a donor, and optionally a purpose, of the same
//! organization. Amounts are strictly positive.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parish_core::error::CoreError;
use parish_core::permissions::{DonationsManage, DonationsView};
use parish_core::types::DbId;
use parish_core::validation::{require_positive, validate_date_range, validate_dto};
use parish_db::models::donation::{CreateDonation, DonationListParams, UpdateDonation};
use parish_db::repositories::{DonationPurposeRepo, DonationRepo, DonorRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequirePermission;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/donations
///
/// Filters: `donor_id`, `purpose_id`, `from`/`to` on the donation date.
pub async fn list_donations(
    RequirePermission(ctx, _): RequirePermission<DonationsView>,
    State(state): State<AppState>,
    Query(params): Query<DonationListParams>,
) -> AppResult<impl IntoResponse> {
    validate_date_range(params.from, params.to)?;
    let org_id = ctx.organization_id()?;
    let items = DonationRepo::list(&state.pool, org_id, &params).await?;
    let total = DonationRepo::count(&state.pool, org_id, &params).await?;

    Ok(Json(DataResponse::page(items, total)))
}

/// GET /api/v1/donations/{id}
pub async fn get_donation(
    RequirePermission(ctx, _): RequirePermission<DonationsView>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let donation = DonationRepo::find_by_id(&state.pool, ctx.organization_id()?, id)
        .await?
        .ok_or(AppError::not_found("Donation", id))?;

    Ok(Json(DataResponse { data: donation }))
}

/// POST /api/v1/donations
pub async fn create_donation(
    RequirePermission(ctx, _): RequirePermission<DonationsManage>,
    State(state): State<AppState>,
    Json(input): Json<CreateDonation>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    require_positive(input.amount, "amount")?;

    let org_id = ctx.organization_id()?;
    ensure_references(&state, org_id, Some(input.donor_id), input.purpose_id).await?;

    let donation = DonationRepo::create(&state.pool, org_id, &input).await?;

    tracing::info!(
        donation_id = donation.id,
        donor_id = donation.donor_id,
        organization_id = org_id,
        "Donation recorded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: donation })))
}

/// PUT /api/v1/donations/{id}
pub async fn update_donation(
    RequirePermission(ctx, _): RequirePermission<DonationsManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDonation>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    if let Some(amount) = input.amount {
        require_positive(amount, "amount")?;
    }

    let org_id = ctx.organization_id()?;
    ensure_references(&state, org_id, input.donor_id, input.purpose_id).await?;

    let donation = DonationRepo::update(&state.pool, org_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Donation", id))?;

    tracing::info!(donation_id = id, organization_id = org_id, "Donation updated");

    Ok(Json(DataResponse { data: donation }))
}

/// DELETE /api/v1/donations/{id}
pub async fn delete_donation(
    RequirePermission(ctx, _): RequirePermission<DonationsManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    if !DonationRepo::delete(&state.pool, org_id, id).await? {
        return Err(AppError::not_found("Donation", id));
    }

    tracing::info!(donation_id = id, organization_id = org_id, "Donation deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Donor and purpose must both live in the caller's organization.
async fn ensure_references(
    state: &AppState,
    organization_id: DbId,
    donor_id: Option<DbId>,
    purpose_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(id) = donor_id {
        DonorRepo::find_by_id(&state.pool, organization_id, id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!("donor_id {id} does not exist")))
            })?;
    }
    if let Some(id) = purpose_id {
        DonationPurposeRepo::find_by_id(&state.pool, organization_id, id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!(
                    "purpose_id {id} does not exist"
                )))
            })?;
    }
    Ok(())
}
