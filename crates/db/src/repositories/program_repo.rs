//! Repository for the `programs` table.

use parish_core::pagination::{
    clamp_limit, clamp_offset, like_term, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
use parish_core::status::PLANNED;
use parish_core::types::DbId;
use sqlx::PgPool;

use crate::models::program::{CreateProgram, Program, ProgramListParams, UpdateProgram};

const COLUMNS: &str = "id, organization_id, name, description, start_date, end_date, location, \
                       status, created_at, updated_at";

/// `$1` organization, `$2` status, `$3` search over name.
const FILTER: &str = "WHERE organization_id = $1 \
                      AND ($2::TEXT IS NULL OR status = $2) \
                      AND ($3::TEXT IS NULL OR name ILIKE '%' || $3 || '%')";

pub struct ProgramRepo;

impl ProgramRepo {
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateProgram,
    ) -> Result<Program, sqlx::Error> {
        let query = format!(
            "INSERT INTO programs (organization_id, name, description, start_date, end_date,
                                   location, status)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, '{PLANNED}'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Program>(&query)
            .bind(organization_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.location)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Program>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM programs WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Program>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Upcoming programs first; undated ones sort last.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        params: &ProgramListParams,
    ) -> Result<Vec<Program>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM programs {FILTER}
             ORDER BY start_date DESC NULLS LAST, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Program>(&query)
            .bind(organization_id)
            .bind(&params.status)
            .bind(like_term(params.search.as_deref()))
            .bind(clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    pub async fn count(
        pool: &PgPool,
        organization_id: DbId,
        params: &ProgramListParams,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM programs {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(organization_id)
            .bind(&params.status)
            .bind(like_term(params.search.as_deref()))
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateProgram,
    ) -> Result<Option<Program>, sqlx::Error> {
        let query = format!(
            "UPDATE programs SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                location = COALESCE($7, location),
                status = COALESCE($8, status)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Program>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.location)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, organization_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM programs WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
