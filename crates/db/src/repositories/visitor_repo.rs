//! Repository for the `visitors` table.

use parish_core::pagination::{
    clamp_limit, clamp_offset, like_term, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
use parish_core::types::DbId;
use sqlx::PgPool;

use crate::models::visitor::{CreateVisitor, UpdateVisitor, Visitor, VisitorListParams};

const COLUMNS: &str = "id, organization_id, full_name, phone, email, visit_date, invited_by, \
                       notes, created_at, updated_at";

/// `$1` organization, `$2`/`$3` visit date range (inclusive), `$4` search.
const FILTER: &str = "WHERE organization_id = $1 \
                      AND ($2::DATE IS NULL OR visit_date >= $2) \
                      AND ($3::DATE IS NULL OR visit_date <= $3) \
                      AND ($4::TEXT IS NULL OR full_name ILIKE '%' || $4 || '%')";

pub struct VisitorRepo;

impl VisitorRepo {
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateVisitor,
    ) -> Result<Visitor, sqlx::Error> {
        let query = format!(
            "INSERT INTO visitors (organization_id, full_name, phone, email, visit_date,
                                   invited_by, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Visitor>(&query)
            .bind(organization_id)
            .bind(&input.full_name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(input.visit_date)
            .bind(&input.invited_by)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Visitor>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM visitors WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Visitor>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Most recent visits first.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        params: &VisitorListParams,
    ) -> Result<Vec<Visitor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM visitors {FILTER}
             ORDER BY visit_date DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Visitor>(&query)
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
        params: &VisitorListParams,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM visitors {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(organization_id)
            .bind(params.from)
            .bind(params.to)
            .bind(like_term(params.search.as_deref()))
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateVisitor,
    ) -> Result<Option<Visitor>, sqlx::Error> {
        let query = format!(
            "UPDATE visitors SET
                full_name = COALESCE($3, full_name),
                phone = COALESCE($4, phone),
                email = COALESCE($5, email),
                visit_date = COALESCE($6, visit_date),
                invited_by = COALESCE($7, invited_by),
                notes = COALESCE($8, notes)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Visitor>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.full_name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(input.visit_date)
            .bind(&input.invited_by)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, organization_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM visitors WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
