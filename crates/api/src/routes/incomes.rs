use axum::routing::get;
use axum::Router;

use crate::handlers::incomes;
use crate::state::AppState;

/// Incomes routes mounted at `/incomes`.
///
/// ```text
/// GET, POST          /        -> list_incomes, create_income
/// GET, PUT, DELETE   /{id}    -> get_income, update_income, delete_income
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(incomes::list_incomes).post(incomes::create_income))
        .route(
            "/{id}",
            get(incomes::get_income)
                .put(incomes::update_income)
                .delete(incomes::delete_income),
        )
}
