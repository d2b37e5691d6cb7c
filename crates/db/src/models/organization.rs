//! Headquarters and organization (tenant) models.

use parish_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full row from the `headquarters` table. Never serialize directly.
#[derive(Debug, Clone, FromRow)]
pub struct Headquarters {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Full row from the `organizations` table. Never serialize directly.
#[derive(Debug, Clone, FromRow)]
pub struct Organization {
    pub id: DbId,
    pub headquarters_id: Option<DbId>,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public representation of a headquarters or organization account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headquarters_id: Option<DbId>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl From<&Headquarters> for AccountResponse {
    fn from(hq: &Headquarters) -> Self {
        Self {
            id: hq.id,
            headquarters_id: None,
            name: hq.name.clone(),
            email: hq.email.clone(),
            phone: hq.phone.clone(),
            address: hq.address.clone(),
            is_active: hq.is_active,
            created_at: hq.created_at,
        }
    }
}

impl From<&Organization> for AccountResponse {
    fn from(org: &Organization) -> Self {
        Self {
            id: org.id,
            headquarters_id: org.headquarters_id,
            name: org.name.clone(),
            email: org.email.clone(),
            phone: org.phone.clone(),
            address: org.address.clone(),
            is_active: org.is_active,
            created_at: org.created_at,
        }
    }
}

/// Registration payload shared by headquarters and organizations.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterAccount {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
}

/// DTO for inserting an account row. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Partial update of an account's profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccount {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    pub is_active: Option<bool>,
}
