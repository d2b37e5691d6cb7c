//! Aggregate rows returned by report queries.

use parish_core::types::Money;
use serde::Serialize;
use sqlx::FromRow;

/// Headline counts for the dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DashboardCounts {
    pub members: i64,
    pub active_members: i64,
    pub visitors: i64,
    pub staff: i64,
    pub donors: i64,
    pub programs: i64,
    pub assets: i64,
}

/// Payroll totals for one status within a period.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PayrollStatusTotals {
    pub status: String,
    pub count: i64,
    pub gross_pay: Money,
    pub paye: Money,
    pub napsa: Money,
    pub other_deductions: Money,
    pub net_pay: Money,
}

/// A ledger total for one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, FromRow)]
pub struct MonthlyAmount {
    pub month: String,
    pub amount: Money,
}
