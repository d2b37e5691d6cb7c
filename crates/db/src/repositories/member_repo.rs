//! Repository for the `members` table.

use parish_core::pagination::{
    clamp_limit, clamp_offset, like_term, DEFAULT_PAGE_LIMIT, MAX_EXPORT_ROWS, MAX_PAGE_LIMIT,
};
use parish_core::status::ACTIVE;
use parish_core::types::DbId;
use sqlx::PgPool;

use crate::models::member::{CreateMember, Member, MemberListParams, UpdateMember};

const COLUMNS: &str = "id, organization_id, first_name, last_name, email, phone, gender, \
                       date_of_birth, address, join_date, status, created_at, updated_at";

/// `$1` organization, `$2` status, `$3` search over name and email.
const FILTER: &str = "WHERE organization_id = $1 \
                      AND ($2::TEXT IS NULL OR status = $2) \
                      AND ($3::TEXT IS NULL \
                           OR first_name || ' ' || last_name ILIKE '%' || $3 || '%' \
                           OR email ILIKE '%' || $3 || '%')";

pub struct MemberRepo;

impl MemberRepo {
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateMember,
    ) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO members (organization_id, first_name, last_name, email, phone, gender,
                                  date_of_birth, address, join_date, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, '{ACTIVE}'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(organization_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.gender)
            .bind(input.date_of_birth)
            .bind(&input.address)
            .bind(input.join_date)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        params: &MemberListParams,
    ) -> Result<Vec<Member>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM members {FILTER}
             ORDER BY last_name ASC, first_name ASC, id ASC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Member>(&query)
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
        params: &MemberListParams,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM members {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(organization_id)
            .bind(&params.status)
            .bind(like_term(params.search.as_deref()))
            .fetch_one(pool)
            .await
    }

    pub async fn export(pool: &PgPool, organization_id: DbId) -> Result<Vec<Member>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM members WHERE organization_id = $1
             ORDER BY last_name ASC, first_name ASC, id ASC
             LIMIT $2"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(organization_id)
            .bind(MAX_EXPORT_ROWS)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateMember,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!(
            "UPDATE members SET
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                gender = COALESCE($7, gender),
                date_of_birth = COALESCE($8, date_of_birth),
                address = COALESCE($9, address),
                join_date = COALESCE($10, join_date),
                status = COALESCE($11, status)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.gender)
            .bind(input.date_of_birth)
            .bind(&input.address)
            .bind(input.join_date)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, organization_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
