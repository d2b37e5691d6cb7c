use axum::routing::{get, put};
use axum::Router;

use crate::handlers::roles;
use crate::state::AppState;

/// Role routes mounted at `/roles`.
///
/// ```text
/// GET, POST          /                    -> list_roles, create_role
/// GET, PUT, DELETE   /{id}                -> get_role, update_role, delete_role
/// PUT                /{id}/permissions    -> set_role_permissions (owner only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(roles::list_roles).post(roles::create_role))
        .route(
            "/{id}",
            get(roles::get_role)
                .put(roles::update_role)
                .delete(roles::delete_role),
        )
        .route("/{id}/permissions", put(roles::set_role_permissions))
}

/// Permission catalogue mounted at `/permissions`.
pub fn permissions_router() -> Router<AppState> {
    Router::new().route("/", get(roles::list_permissions))
}
