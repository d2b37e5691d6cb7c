use axum::routing::get;
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Assets routes mounted at `/assets`.
///
/// ```text
/// GET, POST          /        -> list_assets, create_asset
/// GET, PUT, DELETE   /{id}    -> get_asset, update_asset, delete_asset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list_assets).post(assets::create_asset))
        .route(
            "/{id}",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
}
