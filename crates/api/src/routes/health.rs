//! `GET /health`: liveness plus the database facts an operator checks first
//! after a deploy.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use parish_core::permissions::ALL_PERMISSIONS;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when the database answers and the permission catalogue is
    /// complete, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Newest applied migration, `None` when the database is unreachable.
    pub schema_version: Option<i64>,
    /// Whether every permission the server checks exists in the database.
    pub permissions_seeded: bool,
    pub pool: PoolStats,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let schema = match parish_db::schema_status(&state.pool).await {
        Ok(schema) => Some(schema),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not read schema status");
            None
        }
    };

    let db_healthy = schema.is_some();
    let permissions_seeded = schema
        .as_ref()
        .is_some_and(|s| s.permission_count == ALL_PERMISSIONS.len() as i64);

    Json(HealthResponse {
        status: if permissions_seeded { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        schema_version: schema.and_then(|s| s.schema_version),
        permissions_seeded,
        pool: PoolStats {
            size: state.pool.size(),
            idle: state.pool.num_idle(),
        },
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
