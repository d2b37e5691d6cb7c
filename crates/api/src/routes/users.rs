use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// User routes mounted at `/users`.
///
/// ```text
/// GET, POST          /                       -> list_users, create_user
/// GET, PUT, DELETE   /{id}                   -> get_user, update_user, delete_user
/// POST               /{id}/reset-password    -> reset_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/{id}/reset-password", post(users::reset_password))
}
