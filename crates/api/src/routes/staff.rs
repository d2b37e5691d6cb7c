use axum::routing::get;
use axum::Router;

use crate::handlers::staff;
use crate::state::AppState;

/// Staff routes mounted at `/staff`.
///
/// ```text
/// GET, POST          /        -> list_staff, create_staff
/// GET, PUT, DELETE   /{id}    -> get_staff, update_staff, delete_staff
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(staff::list_staff).post(staff::create_staff))
        .route(
            "/{id}",
            get(staff::get_staff)
                .put(staff::update_staff)
                .delete(staff::delete_staff),
        )
}
