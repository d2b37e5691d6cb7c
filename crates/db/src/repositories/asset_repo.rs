//! Repository for the `assets` register.

use parish_core::pagination::{
    clamp_limit, clamp_offset, like_term, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
use parish_core::status::ACTIVE;
use parish_core::types::DbId;
use sqlx::PgPool;

use crate::models::asset::{Asset, AssetListParams, CreateAsset, UpdateAsset};

const COLUMNS: &str = "id, organization_id, name, category, serial_number, purchase_date, \
                       purchase_cost, location, status, created_at, updated_at";

/// `$1` organization, `$2` status, `$3` category, `$4` search over name and
/// serial number.
const FILTER: &str = "WHERE organization_id = $1 \
                      AND ($2::TEXT IS NULL OR status = $2) \
                      AND ($3::TEXT IS NULL OR category = $3) \
                      AND ($4::TEXT IS NULL \
                           OR name ILIKE '%' || $4 || '%' \
                           OR serial_number ILIKE '%' || $4 || '%')";

pub struct AssetRepo;

impl AssetRepo {
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateAsset,
    ) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets (organization_id, name, category, serial_number, purchase_date,
                                 purchase_cost, location, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, '{ACTIVE}'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(organization_id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.serial_number)
            .bind(input.purchase_date)
            .bind(input.purchase_cost)
            .bind(&input.location)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        params: &AssetListParams,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets {FILTER}
             ORDER BY name ASC, id ASC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(organization_id)
            .bind(&params.status)
            .bind(&params.category)
            .bind(like_term(params.search.as_deref()))
            .bind(clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    pub async fn count(
        pool: &PgPool,
        organization_id: DbId,
        params: &AssetListParams,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM assets {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(organization_id)
            .bind(&params.status)
            .bind(&params.category)
            .bind(like_term(params.search.as_deref()))
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET
                name = COALESCE($3, name),
                category = COALESCE($4, category),
                serial_number = COALESCE($5, serial_number),
                purchase_date = COALESCE($6, purchase_date),
                purchase_cost = COALESCE($7, purchase_cost),
                location = COALESCE($8, location),
                status = COALESCE($9, status)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.serial_number)
            .bind(input.purchase_date)
            .bind(input.purchase_cost)
            .bind(&input.location)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, organization_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
