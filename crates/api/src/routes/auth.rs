use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Authentication routes mounted at `/auth`.
///
/// ```text
/// POST /login                       -> login (user)
/// POST /organization/login          -> organization_login
/// POST /organization/register       -> organization_register
/// POST /headquarters/login          -> headquarters_login
/// POST /headquarters/register       -> headquarters_register
/// GET  /me                          -> me (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/organization/login", post(auth::organization_login))
        .route("/organization/register", post(auth::organization_register))
        .route("/headquarters/login", post(auth::headquarters_login))
        .route("/headquarters/register", post(auth::headquarters_register))
        .route("/me", get(auth::me))
}
