use axum::routing::get;
use axum::Router;

use crate::handlers::visitors;
use crate::state::AppState;

/// Visitors routes mounted at `/visitors`.
///
/// ```text
/// GET, POST          /        -> list_visitors, create_visitor
/// GET, PUT, DELETE   /{id}    -> get_visitor, update_visitor, delete_visitor
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(visitors::list_visitors).post(visitors::create_visitor))
        .route(
            "/{id}",
            get(visitors::get_visitor)
                .put(visitors::update_visitor)
                .delete(visitors::delete_visitor),
        )
}
