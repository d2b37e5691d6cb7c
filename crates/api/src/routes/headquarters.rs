use axum::routing::get;
use axum::Router;

use crate::handlers::headquarters;
use crate::state::AppState;

/// Headquarters routes mounted at `/headquarters`.
///
/// ```text
/// GET         /                        -> get_profile
/// GET, POST   /organizations           -> list_organizations, create_organization
/// GET, PUT    /organizations/{id}      -> get_organization, update_organization
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(headquarters::get_profile))
        .route(
            "/organizations",
            get(headquarters::list_organizations).post(headquarters::create_organization),
        )
        .route(
            "/organizations/{id}",
            get(headquarters::get_organization).put(headquarters::update_organization),
        )
}
