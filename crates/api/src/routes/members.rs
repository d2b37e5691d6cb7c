use axum::routing::get;
use axum::Router;

use crate::handlers::members;
use crate::state::AppState;

/// Members routes mounted at `/members`.
///
/// ```text
/// GET, POST          /        -> list_members, create_member
/// GET, PUT, DELETE   /{id}    -> get_member, update_member, delete_member
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(members::list_members).post(members::create_member))
        .route(
            "/{id}",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
}
