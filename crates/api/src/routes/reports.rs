use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Report routes mounted at `/reports`.
///
/// ```text
/// GET   /finance              -> finance_report
/// GET   /payroll              -> payroll_report
/// GET   /dashboard            -> dashboard
/// GET   /export/{dataset}     -> export_dataset (csv or json)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/finance", get(reports::finance_report))
        .route("/payroll", get(reports::payroll_report))
        .route("/dashboard", get(reports::dashboard))
        .route("/export/{dataset}", get(reports::export_dataset))
}
