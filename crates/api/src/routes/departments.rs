use axum::routing::get;
use axum::Router;

use crate::handlers::departments;
use crate::state::AppState;

/// Departments routes mounted at `/departments`.
///
/// ```text
/// GET, POST          /        -> list_departments, create_department
/// GET, PUT, DELETE   /{id}    -> get_department, update_department, delete_department
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(departments::list_departments).post(departments::create_department))
        .route(
            "/{id}",
            get(departments::get_department)
                .put(departments::update_department)
                .delete(departments::delete_department),
        )
}
