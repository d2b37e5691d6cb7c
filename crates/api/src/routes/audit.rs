use axum::routing::get;
use axum::Router;

use crate::handlers::audit;
use crate::state::AppState;

/// Audit log routes mounted at `/audit-logs`.
///
/// ```text
/// GET   /                   -> list_audit_logs
/// GET   /integrity-check    -> integrity_check
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(audit::list_audit_logs))
        .route("/integrity-check", get(audit::integrity_check))
}
