use axum::routing::get;
use axum::Router;

use crate::handlers::programs;
use crate::state::AppState;

/// Programs routes mounted at `/programs`.
///
/// ```text
/// GET, POST          /        -> list_programs, create_program
/// GET, PUT, DELETE   /{id}    -> get_program, update_program, delete_program
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(programs::list_programs).post(programs::create_program))
        .route(
            "/{id}",
            get(programs::get_program)
                .put(programs::update_program)
                .delete(programs::delete_program),
        )
}
