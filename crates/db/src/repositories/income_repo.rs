//! Repository for the `incomes` ledger.

use parish_core::pagination::{
    clamp_limit, clamp_offset, like_term, DEFAULT_PAGE_LIMIT, MAX_EXPORT_ROWS, MAX_PAGE_LIMIT,
};
use parish_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::income::{CreateIncome, Income, LedgerListParams, UpdateIncome};

const COLUMNS: &str =
    "id, organization_id, source, amount, income_date, description, created_at, updated_at";

/// `$1` organization, `$2`/`$3` date range, `$4` search over source.
const FILTER: &str = "WHERE organization_id = $1 \
                      AND ($2::DATE IS NULL OR income_date >= $2) \
                      AND ($3::DATE IS NULL OR income_date <= $3) \
                      AND ($4::TEXT IS NULL OR source ILIKE '%' || $4 || '%')";

pub struct IncomeRepo;

impl IncomeRepo {
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateIncome,
    ) -> Result<Income, sqlx::Error> {
        let query = format!(
            "INSERT INTO incomes (organization_id, source, amount, income_date, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Income>(&query)
            .bind(organization_id)
            .bind(&input.source)
            .bind(input.amount)
            .bind(input.income_date)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Income>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM incomes WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Income>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        params: &LedgerListParams,
    ) -> Result<Vec<Income>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM incomes {FILTER}
             ORDER BY income_date DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Income>(&query)
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
        let query = format!("SELECT COUNT(*) FROM incomes {FILTER}");
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
    ) -> Result<Vec<Income>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM incomes
             WHERE organization_id = $1
               AND ($2::DATE IS NULL OR income_date >= $2)
               AND ($3::DATE IS NULL OR income_date <= $3)
             ORDER BY income_date ASC, id ASC
             LIMIT $4"
        );
        sqlx::query_as::<_, Income>(&query)
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
        input: &UpdateIncome,
    ) -> Result<Option<Income>, sqlx::Error> {
        let query = format!(
            "UPDATE incomes SET
                source = COALESCE($3, source),
                amount = COALESCE($4, amount),
                income_date = COALESCE($5, income_date),
                description = COALESCE($6, description)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Income>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.source)
            .bind(input.amount)
            .bind(input.income_date)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, organization_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM incomes WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
