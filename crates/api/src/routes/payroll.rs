use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::payroll;
use crate::state::AppState;

/// Payroll routes mounted at `/payroll`.
///
/// ```text
/// GET, POST          /               -> list_payroll, create_payroll
/// POST               /preview        -> preview_payroll
/// POST               /generate       -> generate_payroll
/// GET, PUT, DELETE   /{id}           -> get_payroll, update_payroll, delete_payroll
/// PATCH              /{id}/status    -> update_payroll_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(payroll::list_payroll).post(payroll::create_payroll))
        .route("/preview", post(payroll::preview_payroll))
        .route("/generate", post(payroll::generate_payroll))
        .route(
            "/{id}",
            get(payroll::get_payroll)
                .put(payroll::update_payroll)
                .delete(payroll::delete_payroll),
        )
        .route("/{id}/status", patch(payroll::update_payroll_status))
}
