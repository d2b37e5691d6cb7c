//! Income ledger model and DTOs.

use parish_core::types::{Date, DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Income {
    pub id: DbId,
    pub organization_id: DbId,
    pub source: String,
    pub amount: Money,
    pub income_date: Date,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateIncome {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub source: String,
    pub amount: Money,
    pub income_date: Date,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateIncome {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub source: Option<String>,
    pub amount: Option<Money>,
    pub income_date: Option<Date>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Date-range filter shared by the income and expense ledgers.
#[derive(Debug, Default, Deserialize)]
pub struct LedgerListParams {
    pub from: Option<Date>,
    pub to: Option<Date>,
    /// Matches `source` for incomes and `category` for expenses.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
