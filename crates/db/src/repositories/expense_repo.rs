//! Repository for the `expenses` ledger.

use parish_core::pagination::{
    clamp_limit, clamp_offset, like_term, DEFAULT_PAGE_LIMIT, MAX_EXPORT_ROWS, MAX_PAGE_LIMIT,
};
use parish_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::expense::{CreateExpense, Expense, UpdateExpense};
use crate::models::income::LedgerListParams;

const COLUMNS: &str = "id, organization_id, department_id, category, amount, expense_date, \
                       description, created_at, updated_at";

/// `$1` organization, `$2`/`$3` date range, `$4` search over category.
const FILTER: &str = "WHERE organization_id = $1 \
                      AND ($2::DATE IS NULL OR expense_date >= $2) \
                      AND ($3::DATE IS NULL OR expense_date <= $3) \
                      AND ($4::TEXT IS NULL OR category ILIKE '%' || $4 || '%')";

pub struct ExpenseRepo;

impl ExpenseRepo {
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateExpense,
    ) -> Result<Expense, sqlx::Error> {
        let query = format!(
            "INSERT INTO expenses (organization_id, department_id, category, amount,
                                   expense_date, description)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(organization_id)
            .bind(input.department_id)
            .bind(&input.category)
            .bind(input.amount)
            .bind(input.expense_date)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM expenses WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        params: &LedgerListParams,
    ) -> Result<Vec<Expense>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM expenses {FILTER}
             ORDER BY expense_date DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(organization_id)
            .bind(params.from)
            .bind(params.to)
            .bind(like_term(params.search.as_deref()))
            .bind(clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    pub async fn count(
        pool: &PgPool,
        organization_id: DbId,
        params: &LedgerListParams,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM expenses {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(organization_id)
            .bind(params.from)
            .bind(params.to)
            .bind(like_term(params.search.as_deref()))
            .fetch_one(pool)
            .await
    }

    pub async fn export(
        pool: &PgPool,
        organization_id: DbId,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Vec<Expense>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM expenses
             WHERE organization_id = $1
               AND ($2::DATE IS NULL OR expense_date >= $2)
               AND ($3::DATE IS NULL OR expense_date <= $3)
             ORDER BY expense_date ASC, id ASC
             LIMIT $4"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(organization_id)
            .bind(from)
            .bind(to)
            .bind(MAX_EXPORT_ROWS)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateExpense,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!(
            "UPDATE expenses SET
                department_id = COALESCE($3, department_id),
                category = COALESCE($4, category),
                amount = COALESCE($5, amount),
                expense_date = COALESCE($6, expense_date),
                description = COALESCE($7, description)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(input.department_id)
            .bind(&input.category)
            .bind(input.amount)
            .bind(input.expense_date)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, organization_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
