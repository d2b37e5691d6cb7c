//! Shared response envelope types for API handlers.
//!
//! All API responses except the token endpoints use a `{ "data": ... }`
//! envelope. Use [`DataResponse`] instead of ad-hoc `json!` bodies.

use parish_db::models::Page;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": { "items": [...], "total": n } }` for paginated lists.
pub type PageResponse<T> = DataResponse<Page<T>>;

impl<T: Serialize> DataResponse<Page<T>> {
    pub fn page(items: Vec<T>, total: i64) -> Self {
        Self {
            data: Page { items, total },
        }
    }
}
