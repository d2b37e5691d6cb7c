//! User entity model and DTOs.

use parish_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub organization_id: DbId,
    pub role_id: DbId,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub organization_id: DbId,
    pub role_id: DbId,
    /// Resolved role name.
    pub role: String,
    pub full_name: String,
    pub email: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub full_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
    pub role_id: DbId,
}

/// DTO for inserting a user. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub organization_id: DbId,
    pub role_id: DbId,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub full_name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub role_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// Request body for `POST /users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPassword {
    pub new_password: String,
}
