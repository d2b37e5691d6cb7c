//! Repository for the `departments` table.

use parish_core::pagination::{
    clamp_limit, clamp_offset, like_term, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
use parish_core::types::DbId;
use sqlx::PgPool;

use crate::models::department::{
    CreateDepartment, Department, DepartmentListParams, UpdateDepartment,
};

const COLUMNS: &str = "id, organization_id, name, description, created_at, updated_at";

/// `$1` organization, `$2` search.
const FILTER: &str = "WHERE organization_id = $1 \
                      AND ($2::TEXT IS NULL OR name ILIKE '%' || $2 || '%')";

pub struct DepartmentRepo;

impl DepartmentRepo {
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateDepartment,
    ) -> Result<Department, sqlx::Error> {
        let query = format!(
            "INSERT INTO departments (organization_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(organization_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Department>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM departments WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Department>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List departments ordered by name.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        params: &DepartmentListParams,
    ) -> Result<Vec<Department>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM departments {FILTER} ORDER BY name ASC LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(organization_id)
            .bind(like_term(params.search.as_deref()))
            .bind(clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    pub async fn count(
        pool: &PgPool,
        organization_id: DbId,
        params: &DepartmentListParams,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM departments {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(organization_id)
            .bind(like_term(params.search.as_deref()))
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateDepartment,
    ) -> Result<Option<Department>, sqlx::Error> {
        let query = format!(
            "UPDATE departments SET
                name = COALESCE($3, name),
                description = COALESCE($4, description)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, organization_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
