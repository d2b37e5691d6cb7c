//! Fixed asset register model and DTOs.

use parish_core::types::{Date, DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub organization_id: DbId,
    pub name: String,
    pub category: Option<String>,
    pub serial_number: Option<String>,
    pub purchase_date: Option<Date>,
    pub purchase_cost: Option<Money>,
    pub location: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAsset {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 100))]
    pub serial_number: Option<String>,
    pub purchase_date: Option<Date>,
    pub purchase_cost: Option<Money>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    /// Defaults to `Active`.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAsset {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 100))]
    pub serial_number: Option<String>,
    pub purchase_date: Option<Date>,
    pub purchase_cost: Option<Money>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub status: Option<String>,
}

/// Query parameters for `GET /assets`.
#[derive(Debug, Default, Deserialize)]
pub struct AssetListParams {
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
