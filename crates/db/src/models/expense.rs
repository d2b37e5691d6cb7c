//! Expense ledger model and DTOs.

use parish_core::types::{Date, DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Expense {
    pub id: DbId,
    pub organization_id: DbId,
    pub department_id: Option<DbId>,
    pub category: String,
    pub amount: Money,
    pub expense_date: Date,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpense {
    pub department_id: Option<DbId>,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub category: String,
    pub amount: Money,
    pub expense_date: Date,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateExpense {
    pub department_id: Option<DbId>,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub category: Option<String>,
    pub amount: Option<Money>,
    pub expense_date: Option<Date>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}
