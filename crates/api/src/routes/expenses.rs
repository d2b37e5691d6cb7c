use axum::routing::get;
use axum::Router;

use crate::handlers::expenses;
use crate::state::AppState;

/// Expenses routes mounted at `/expenses`.
///
/// ```text
/// GET, POST          /        -> list_expenses, create_expense
/// GET, PUT, DELETE   /{id}    -> get_expense, update_expense, delete_expense
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(expenses::list_expenses).post(expenses::create_expense))
        .route(
            "/{id}",
            get(expenses::get_expense)
                .put(expenses::update_expense)
                .delete(expenses::delete_expense),
        )
}
