//! Donor and donation purpose routes.
//!
//! Two routers are provided:
//! - `router()` for donors mounted at `/donors`
//! - `purposes_router()` for donation purposes mounted at `/donation-purposes`

use axum::routing::get;
use axum::Router;

use crate::handlers::donors;
use crate::state::AppState;

/// Donor routes mounted at `/donors`.
///
/// ```text
/// GET, POST          /        -> list_donors, create_donor
/// GET, PUT, DELETE   /{id}    -> get_donor, update_donor, delete_donor
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(donors::list_donors).post(donors::create_donor))
        .route(
            "/{id}",
            get(donors::get_donor)
                .put(donors::update_donor)
                .delete(donors::delete_donor),
        )
}

/// Donation purpose routes mounted at `/donation-purposes`.
///
/// ```text
/// GET, POST          /        -> list_purposes, create_purpose
/// GET, PUT, DELETE   /{id}    -> get_purpose, update_purpose, delete_purpose
/// ```
pub fn purposes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(donors::list_purposes).post(donors::create_purpose))
        .route(
            "/{id}",
            get(donors::get_purpose)
                .put(donors::update_purpose)
                .delete(donors::delete_purpose),
        )
}
