use axum::routing::get;
use axum::Router;

use crate::handlers::donations;
use crate::state::AppState;

/// Donations routes mounted at `/donations`.
///
/// ```text
/// GET, POST          /        -> list_donations, create_donation
/// GET, PUT, DELETE   /{id}    -> get_donation, update_donation, delete_donation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(donations::list_donations).post(donations::create_donation))
        .route(
            "/{id}",
            get(donations::get_donation)
                .put(donations::update_donation)
                .delete(donations::delete_donation),
        )
}
