//! Visitor (first-time guest) model and DTOs.

use parish_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Visitor {
    pub id: DbId,
    pub organization_id: DbId,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub visit_date: Date,
    pub invited_by: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVisitor {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub full_name: String,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub visit_date: Date,
    #[validate(length(max = 200))]
    pub invited_by: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVisitor {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub full_name: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub visit_date: Option<Date>,
    #[validate(length(max = 200))]
    pub invited_by: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Query parameters for `GET /visitors`.
#[derive(Debug, Default, Deserialize)]
pub struct VisitorListParams {
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
