//! Staff (employee) model and DTOs.

use parish_core::types::{Date, DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Staff {
    pub id: DbId,
    pub organization_id: DbId,
    pub department_id: Option<DbId>,
    pub role_id: Option<DbId>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub basic_salary: Money,
    pub hire_date: Option<Date>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStaff {
    pub department_id: Option<DbId>,
    pub role_id: Option<DbId>,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 100))]
    pub position: Option<String>,
    #[serde(default)]
    pub basic_salary: Money,
    pub hire_date: Option<Date>,
    /// Defaults to `Active`.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStaff {
    pub department_id: Option<DbId>,
    pub role_id: Option<DbId>,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 100))]
    pub position: Option<String>,
    pub basic_salary: Option<Money>,
    pub hire_date: Option<Date>,
    pub status: Option<String>,
}

/// Query parameters for `GET /staff`.
#[derive(Debug, Default, Deserialize)]
pub struct StaffListParams {
    pub department_id: Option<DbId>,
    pub status: Option<String>,
    /// Case-insensitive match on first or last name.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
