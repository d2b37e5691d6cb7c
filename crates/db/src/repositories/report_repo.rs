//! Aggregate queries behind the reporting endpoints.

use parish_core::status::ACTIVE;
use parish_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::report::{DashboardCounts, MonthlyAmount, PayrollStatusTotals};

/// A money ledger that can be summed per month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ledger {
    Incomes,
    Donations,
    Expenses,
}

impl Ledger {
    fn table_and_date_column(self) -> (&'static str, &'static str) {
        match self {
            Ledger::Incomes => ("incomes", "income_date"),
            Ledger::Donations => ("donations", "donation_date"),
            Ledger::Expenses => ("expenses", "expense_date"),
        }
    }
}

pub struct ReportRepo;

impl ReportRepo {
    pub async fn dashboard_counts(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<DashboardCounts, sqlx::Error> {
        sqlx::query_as::<_, DashboardCounts>(
            "SELECT
                (SELECT COUNT(*) FROM members WHERE organization_id = $1) AS members,
                (SELECT COUNT(*) FROM members
                  WHERE organization_id = $1 AND status = $2) AS active_members,
                (SELECT COUNT(*) FROM visitors WHERE organization_id = $1) AS visitors,
                (SELECT COUNT(*) FROM staff WHERE organization_id = $1) AS staff,
                (SELECT COUNT(*) FROM donors WHERE organization_id = $1) AS donors,
                (SELECT COUNT(*) FROM programs WHERE organization_id = $1) AS programs,
                (SELECT COUNT(*) FROM assets WHERE organization_id = $1) AS assets",
        )
        .bind(organization_id)
        .bind(ACTIVE)
        .fetch_one(pool)
        .await
    }

    /// Per-month sums of a ledger within an optional inclusive date range,
    /// ordered by month.
    pub async fn monthly_totals(
        pool: &PgPool,
        organization_id: DbId,
        ledger: Ledger,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Vec<MonthlyAmount>, sqlx::Error> {
        let (table, date_col) = ledger.table_and_date_column();
        let query = format!(
            "SELECT to_char({date_col}, 'YYYY-MM') AS month, SUM(amount) AS amount
             FROM {table}
             WHERE organization_id = $1
               AND ($2::DATE IS NULL OR {date_col} >= $2)
               AND ($3::DATE IS NULL OR {date_col} <= $3)
             GROUP BY month
             ORDER BY month ASC"
        );
        sqlx::query_as::<_, MonthlyAmount>(&query)
            .bind(organization_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Payroll totals split by status for an optional year and month.
    pub async fn payroll_totals(
        pool: &PgPool,
        organization_id: DbId,
        year: Option<i32>,
        month: Option<i32>,
    ) -> Result<Vec<PayrollStatusTotals>, sqlx::Error> {
        sqlx::query_as::<_, PayrollStatusTotals>(
            "SELECT status,
                    COUNT(*) AS count,
                    COALESCE(SUM(gross_pay), 0) AS gross_pay,
                    COALESCE(SUM(paye), 0) AS paye,
                    COALESCE(SUM(napsa), 0) AS napsa,
                    COALESCE(SUM(other_deductions), 0) AS other_deductions,
                    COALESCE(SUM(net_pay), 0) AS net_pay
             FROM payrolls
             WHERE organization_id = $1
               AND ($2::INTEGER IS NULL OR period_year = $2)
               AND ($3::INTEGER IS NULL OR period_month = $3)
             GROUP BY status
             ORDER BY status ASC",
        )
        .bind(organization_id)
        .bind(year)
        .bind(month)
        .fetch_all(pool)
        .await
    }
}
