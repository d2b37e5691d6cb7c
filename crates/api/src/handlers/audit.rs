//! Handlers for the tenant audit log.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use parish_core::audit::verify_chain;
use parish_core::permissions::AuditView;
use parish_db::models::audit::AuditQuery;
use parish_db::repositories::AuditLogRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequirePermission;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/audit-logs
///
/// Newest first. Filters: `action_type`, `entity_type`, `entity_id`,
/// `actor_id`.
pub async fn list_audit_logs(
    RequirePermission(ctx, _): RequirePermission<AuditView>,
    State(state): State<AppState>,
    Query(params): Query<AuditQuery>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    let items = AuditLogRepo::query(&state.pool, org_id, &params).await?;
    let total = AuditLogRepo::count(&state.pool, org_id, &params).await?;

    Ok(Json(DataResponse::page(items, total)))
}

#[derive(Debug, Serialize)]
pub struct IntegrityReport {
    pub total: usize,
    pub verified: i64,
    pub intact: bool,
    pub first_broken_id: Option<i64>,
}

/// GET /api/v1/audit-logs/integrity-check
///
/// Recompute the organization's hash chain and report the first entry whose
/// stored hash does not match.
pub async fn integrity_check(
    RequirePermission(ctx, _): RequirePermission<AuditView>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let org_id = ctx.organization_id()?;
    let chain = AuditLogRepo::fetch_chain(&state.pool, org_id).await?;
    let result = verify_chain(
        chain
            .iter()
            .map(|e| (e.id, e.chained_fields(), e.integrity_hash.as_str())),
    );

    if !result.is_intact() {
        tracing::warn!(
            organization_id = org_id,
            first_broken_id = ?result.first_broken_id,
            "Audit chain integrity failure",
        );
    }

    Ok(Json(DataResponse {
        data: IntegrityReport {
            total: chain.len(),
            verified: result.verified,
            intact: result.is_intact(),
            first_broken_id: result.first_broken_id,
        },
    }))
}
