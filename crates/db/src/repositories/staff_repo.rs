//! Repository for the `staff` table.

use parish_core::pagination::{
    clamp_limit, clamp_offset, like_term, DEFAULT_PAGE_LIMIT, MAX_EXPORT_ROWS, MAX_PAGE_LIMIT,
};
use parish_core::status::ACTIVE;
use parish_core::types::DbId;
use sqlx::PgPool;

use crate::models::staff::{CreateStaff, Staff, StaffListParams, UpdateStaff};

const COLUMNS: &str = "id, organization_id, department_id, role_id, first_name, last_name, \
                       email, phone, position, basic_salary, hire_date, status, \
                       created_at, updated_at";

/// `$1` organization, `$2` department, `$3` status, `$4` search.
const FILTER: &str = "WHERE organization_id = $1 \
                      AND ($2::BIGINT IS NULL OR department_id = $2) \
                      AND ($3::TEXT IS NULL OR status = $3) \
                      AND ($4::TEXT IS NULL OR first_name || ' ' || last_name ILIKE '%' || $4 || '%')";

pub struct StaffRepo;

impl StaffRepo {
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateStaff,
    ) -> Result<Staff, sqlx::Error> {
        let query = format!(
            "INSERT INTO staff (organization_id, department_id, role_id, first_name, last_name,
                                email, phone, position, basic_salary, hire_date, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, '{ACTIVE}'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(organization_id)
            .bind(input.department_id)
            .bind(input.role_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.position)
            .bind(input.basic_salary)
            .bind(input.hire_date)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Staff>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM staff WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Staff>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List staff ordered by last name, first name.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        params: &StaffListParams,
    ) -> Result<Vec<Staff>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM staff {FILTER}
             ORDER BY last_name ASC, first_name ASC, id ASC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(organization_id)
            .bind(params.department_id)
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
        params: &StaffListParams,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM staff {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(organization_id)
            .bind(params.department_id)
            .bind(&params.status)
            .bind(like_term(params.search.as_deref()))
            .fetch_one(pool)
            .await
    }

    /// Every staff row of a tenant, capped at the export limit.
    pub async fn export(pool: &PgPool, organization_id: DbId) -> Result<Vec<Staff>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM staff WHERE organization_id = $1
             ORDER BY last_name ASC, first_name ASC, id ASC
             LIMIT $2"
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(organization_id)
            .bind(MAX_EXPORT_ROWS)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateStaff,
    ) -> Result<Option<Staff>, sqlx::Error> {
        let query = format!(
            "UPDATE staff SET
                department_id = COALESCE($3, department_id),
                role_id = COALESCE($4, role_id),
                first_name = COALESCE($5, first_name),
                last_name = COALESCE($6, last_name),
                email = COALESCE($7, email),
                phone = COALESCE($8, phone),
                position = COALESCE($9, position),
                basic_salary = COALESCE($10, basic_salary),
                hire_date = COALESCE($11, hire_date),
                status = COALESCE($12, status)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(input.department_id)
            .bind(input.role_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.position)
            .bind(input.basic_salary)
            .bind(input.hire_date)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while payroll rows reference the
    /// staff member.
    pub async fn delete(pool: &PgPool, organization_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM staff WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
