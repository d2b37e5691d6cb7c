//! Handlers for the `/visitors` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use parish_core::permissions::{VisitorsManage, VisitorsView};
use parish_core::types::DbId;
use parish_core::validation::{validate_date_range, validate_dto};
use parish_db::models::visitor::{CreateVisitor, UpdateVisitor, VisitorListParams};
use parish_db::repositories::VisitorRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequirePermission;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/visitors
///
/// Filters: `from`/`to` on the visit date, `search` on the name.
pub async fn list_visitors(
    RequirePermission(ctx, _): RequirePermission<VisitorsView>,
    State(state): State<AppState>,
    Query(params): Query<VisitorListParams>,
) -> AppResult<impl IntoResponse> {
    validate_date_range(params.from, params.to)?;
    let org_id = ctx.organization_id()?;
    let items = VisitorRepo::list(&state.pool, org_id, &params).await?;
    let total = VisitorRepo::count(&state.pool, org_id, &params).await?;

    Ok(Json(DataResponse::page(items, total)))
}

/// GET /api/v1/visitors/{id}
pub async fn get_visitor(
    RequirePermission(ctx, _): RequirePermission<VisitorsView>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let visitor = VisitorRepo::find_by_id(&state.pool, ctx.organization_id()?, id)
        .await?
        .ok_or(AppError::not_found("Visitor", id))?;

    Ok(Json(DataResponse { data: visitor }))
}

/// POST /api/v1/visitors
pub async fn create_visitor(
    RequirePermission(ctx, _): RequirePermission<VisitorsManage>,
    State(state): State<AppState>,
    Json(input): Json<CreateVisitor>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    let org_id = ctx.organization_id()?;
    let visitor = VisitorRepo::create(&state.pool, org_id, &input).await?;

    tracing::info!(visitor_id = visitor.id, organization_id = org_id, "Visitor recorded");

    Ok((StatusCode::CREATED, Json(DataResponse { data: visitor })))
}

/// PUT /api/v1/visitors/{id}
pub async fn update_visitor(
    RequirePermission(ctx, _): RequirePermission<VisitorsManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVisitor>,
) -> AppResult<impl IntoResponse> {
    validate_dto(&input)?;
    let org_id = ctx.organization_id()?;
    let visitor = VisitorRepo::update(&state.pool, org_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Visitor", id))?;

    tracing::info!(visitor_id = id, organization_id = org_id, "Visitor updated");

    Ok(Json(DataResponse { data: visitor }))
}

/// DELETE /api/v1/visitors/{id}
pub async fn delete_visitor(
    RequirePermission(ctx, _): RequirePermission<VisitorsManage>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    if !VisitorRepo::delete(&state.pool, org_id, id).await? {
        return Err(AppError::not_found("Visitor", id));
    }

    tracing::info!(visitor_id = id, organization_id = org_id, "Visitor deleted");

    Ok(StatusCode::NO_CONTENT)
}
