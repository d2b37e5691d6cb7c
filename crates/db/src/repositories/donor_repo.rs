//! Repositories for `donors` and `donation_purposes`.

use parish_core::pagination::{
    clamp_limit, clamp_offset, like_term, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
use parish_core::types::DbId;
use sqlx::PgPool;

use crate::models::donor::{
    CreateDonationPurpose, CreateDonor, DonationPurpose, Donor, DonorListParams,
    UpdateDonationPurpose, UpdateDonor,
};

const DONOR_COLUMNS: &str =
    "id, organization_id, full_name, email, phone, address, created_at, updated_at";

const PURPOSE_COLUMNS: &str = "id, organization_id, name, description, created_at, updated_at";

/// `$1` organization, `$2` search over name and email.
const DONOR_FILTER: &str = "WHERE organization_id = $1 \
                            AND ($2::TEXT IS NULL \
                                 OR full_name ILIKE '%' || $2 || '%' \
                                 OR email ILIKE '%' || $2 || '%')";

pub struct DonorRepo;

impl DonorRepo {
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateDonor,
    ) -> Result<Donor, sqlx::Error> {
        let query = format!(
            "INSERT INTO donors (organization_id, full_name, email, phone, address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {DONOR_COLUMNS}"
        );
        sqlx::query_as::<_, Donor>(&query)
            .bind(organization_id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Donor>, sqlx::Error> {
        let query =
            format!("SELECT {DONOR_COLUMNS} FROM donors WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Donor>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        params: &DonorListParams,
    ) -> Result<Vec<Donor>, sqlx::Error> {
        let query = format!(
            "SELECT {DONOR_COLUMNS} FROM donors {DONOR_FILTER}
             ORDER BY full_name ASC, id ASC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Donor>(&query)
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
        params: &DonorListParams,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM donors {DONOR_FILTER}");
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
        input: &UpdateDonor,
    ) -> Result<Option<Donor>, sqlx::Error> {
        let query = format!(
            "UPDATE donors SET
                full_name = COALESCE($3, full_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address)
             WHERE id = $1 AND organization_id = $2
             RETURNING {DONOR_COLUMNS}"
        );
        sqlx::query_as::<_, Donor>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_optional(pool)
            .await
    }

    /// Fails with a foreign-key violation while donations reference the donor.
    pub async fn delete(pool: &PgPool, organization_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM donors WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct DonationPurposeRepo;

impl DonationPurposeRepo {
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateDonationPurpose,
    ) -> Result<DonationPurpose, sqlx::Error> {
        let query = format!(
            "INSERT INTO donation_purposes (organization_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {PURPOSE_COLUMNS}"
        );
        sqlx::query_as::<_, DonationPurpose>(&query)
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
    ) -> Result<Option<DonationPurpose>, sqlx::Error> {
        let query = format!(
            "SELECT {PURPOSE_COLUMNS} FROM donation_purposes WHERE id = $1 AND organization_id = $2"
        );
        sqlx::query_as::<_, DonationPurpose>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Purposes are few per tenant, so the list is unpaginated.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<DonationPurpose>, sqlx::Error> {
        let query = format!(
            "SELECT {PURPOSE_COLUMNS} FROM donation_purposes
             WHERE organization_id = $1
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, DonationPurpose>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateDonationPurpose,
    ) -> Result<Option<DonationPurpose>, sqlx::Error> {
        let query = format!(
            "UPDATE donation_purposes SET
                name = COALESCE($3, name),
                description = COALESCE($4, description)
             WHERE id = $1 AND organization_id = $2
             RETURNING {PURPOSE_COLUMNS}"
        );
        sqlx::query_as::<_, DonationPurpose>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, organization_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM donation_purposes WHERE id = $1 AND organization_id = $2")
                .bind(id)
                .bind(organization_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
