//! Handlers for the `/assets` register.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parish_core::permissions::{AssetsManage, AssetsView};
use parish_core::status::{validate_optional_status, ASSET_STATUSES};
use parish_core::types::DbId;
use parish_core::validation::{require_non_negative, validate_dto};
use parish_db::models::asset::{AssetListParams, CreateAsset, UpdateAsset};
use parish_db::repositories::AssetRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequirePermission;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/assets
pub async fn list_assets(
    RequirePermission(ctx, _): RequirePermission<AssetsView>,
    State(state): State<AppState>,
    Query(params): Query<AssetListParams>,
) -> AppResult<impl IntoResponse> {
    validate_optional_status(params.status.as_deref(), ASSET_STATUSES, "status")?;
    let org_id = ctx.organization_id()?;
    let items = AssetRepo::list(&state.pool, org_id, &params).await?;
    let total = AssetRepo::count(&state.pool, org_id, &params).await?;

    Ok(Json(DataResponse::page(items, total)))
}

/// GET /api/v1/assets/{id}
pub async fn get_asset(
    RequirePermission(ctx, _): RequirePermission<AssetsView>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = AssetRepo::find_by_id(&state.pool, ctx.organization_id()?, id)
        .await?
        .ok_or(AppError::not_found("Asset", id))?;

    Ok(Json(DataResponse { data: asset }))
}

/// POST /api/v1/assets
pub async fn create_asset(
    RequirePermission(ctx, _): RequirePermission<AssetsManage>,
    State(state): State<AppState>,
    Json(input): Json<CreateAsset>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    validate_optional_status(input.status.as_deref(), ASSET_STATUSES, "status")?;
    if let Some(cost) = input.purchase_cost {
        require_non_negative(cost, "purchase_cost")?;
    }

    let org_id = ctx.organization_id()?;
    let asset = AssetRepo::create(&state.pool, org_id, &input).await?;

    tracing::info!(asset_id = asset.id, organization_id = org_id, "Asset registered");

    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// PUT /api/v1/assets/{id}
pub async fn update_asset(
    RequirePermission(ctx, _): RequirePermission<AssetsManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAsset>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    validate_optional_status(input.status.as_deref(), ASSET_STATUSES, "status")?;
    if let Some(cost) = input.purchase_cost {
        require_non_negative(cost, "purchase_cost")?;
    }

    let org_id = ctx.organization_id()?;
    let asset = AssetRepo::update(&state.pool, org_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Asset", id))?;

    tracing::info!(asset_id = id, organization_id = org_id, "Asset updated");

    Ok(Json(DataResponse { data: asset }))
}

/// DELETE /api/v1/assets/{id}
pub async fn delete_asset(
    RequirePermission(ctx, _): RequirePermission<AssetsManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    if !AssetRepo::delete(&state.pool, org_id, id).await? {
        return Err(AppError::not_found("Asset", id));
    }

    tracing::info!(asset_id = id, organization_id = org_id, "Asset deleted");

    Ok(StatusCode::NO_CONTENT)
}
