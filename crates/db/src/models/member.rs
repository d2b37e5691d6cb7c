//! Congregation member model and DTOs.

use parish_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: DbId,
    pub organization_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<Date>,
    pub address: Option<String>,
    pub join_date: Option<Date>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMember {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 20))]
    pub gender: Option<String>,
    pub date_of_birth: Option<Date>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    pub join_date: Option<Date>,
    /// Defaults to `Active`.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMember {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 20))]
    pub gender: Option<String>,
    pub date_of_birth: Option<Date>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    pub join_date: Option<Date>,
    pub status: Option<String>,
}

/// Query parameters for `GET /members`.
#[derive(Debug, Default, Deserialize)]
pub struct MemberListParams {
    pub status: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
