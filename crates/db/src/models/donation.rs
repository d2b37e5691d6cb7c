//! Donation model and DTOs.

use parish_core::types::{Date, DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A donation row joined with its donor and purpose names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Donation {
    pub id: DbId,
    pub organization_id: DbId,
    pub donor_id: DbId,
    pub donor_name: String,
    pub purpose_id: Option<DbId>,
    pub purpose_name: Option<String>,
    pub amount: Money,
    pub donation_date: Date,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDonation {
    pub donor_id: DbId,
    pub purpose_id: Option<DbId>,
    pub amount: Money,
    pub donation_date: Date,
    #[validate(length(max = 50))]
    pub payment_method: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDonation {
    pub donor_id: Option<DbId>,
    pub purpose_id: Option<DbId>,
    pub amount: Option<Money>,
    pub donation_date: Option<Date>,
    #[validate(length(max = 50))]
    pub payment_method: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Query parameters for `GET /donations`.
#[derive(Debug, Default, Deserialize)]
pub struct DonationListParams {
    pub donor_id: Option<DbId>,
    pub purpose_id: Option<DbId>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
