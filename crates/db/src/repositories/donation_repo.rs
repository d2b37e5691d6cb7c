//! Repository for the `donations` table.
//!
//! Reads join `donors` and `donation_purposes` so responses carry display
//! names alongside the ids.

use parish_core::pagination::{
    clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_EXPORT_ROWS, MAX_PAGE_LIMIT,
};
use parish_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::donation::{CreateDonation, Donation, DonationListParams, UpdateDonation};

const SELECT: &str = "SELECT d.id, d.organization_id, d.donor_id, dn.full_name AS donor_name, \
                      d.purpose_id, p.name AS purpose_name, d.amount, d.donation_date, \
                      d.payment_method, d.notes, d.created_at, d.updated_at \
                      FROM donations d \
                      JOIN donors dn ON dn.id = d.donor_id \
                      LEFT JOIN donation_purposes p ON p.id = d.purpose_id";

/// `$1` organization, `$2` donor, `$3` purpose, `$4`/`$5` date range.
const FILTER: &str = "WHERE d.organization_id = $1 \
                      AND ($2::BIGINT IS NULL OR d.donor_id = $2) \
                      AND ($3::BIGINT IS NULL OR d.purpose_id = $3) \
                      AND ($4::DATE IS NULL OR d.donation_date >= $4) \
                      AND ($5::DATE IS NULL OR d.donation_date <= $5)";

pub struct DonationRepo;

impl DonationRepo {
    /// Insert a donation and return it with joined names.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateDonation,
    ) -> Result<Donation, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO donations (organization_id, donor_id, purpose_id, amount,
                                    donation_date, payment_method, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(organization_id)
        .bind(input.donor_id)
        .bind(input.purpose_id)
        .bind(input.amount)
        .bind(input.donation_date)
        .bind(&input.payment_method)
        .bind(&input.notes)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, organization_id, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Donation>, sqlx::Error> {
        let query = format!("{SELECT} WHERE d.id = $1 AND d.organization_id = $2");
        sqlx::query_as::<_, Donation>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Newest donations first.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        params: &DonationListParams,
    ) -> Result<Vec<Donation>, sqlx::Error> {
        let query = format!(
            "{SELECT} {FILTER} ORDER BY d.donation_date DESC, d.id DESC LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, Donation>(&query)
            .bind(organization_id)
            .bind(params.donor_id)
            .bind(params.purpose_id)
            .bind(params.from)
            .bind(params.to)
            .bind(clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    pub async fn count(
        pool: &PgPool,
        organization_id: DbId,
        params: &DonationListParams,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM donations d {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(organization_id)
            .bind(params.donor_id)
            .bind(params.purpose_id)
            .bind(params.from)
            .bind(params.to)
            .fetch_one(pool)
            .await
    }

    /// Donations in a date range, oldest first, capped at the export limit.
    pub async fn export(
        pool: &PgPool,
        organization_id: DbId,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Vec<Donation>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE d.organization_id = $1
               AND ($2::DATE IS NULL OR d.donation_date >= $2)
               AND ($3::DATE IS NULL OR d.donation_date <= $3)
             ORDER BY d.donation_date ASC, d.id ASC
             LIMIT $4"
        );
        sqlx::query_as::<_, Donation>(&query)
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
        input: &UpdateDonation,
    ) -> Result<Option<Donation>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE donations SET
                donor_id = COALESCE($3, donor_id),
                purpose_id = COALESCE($4, purpose_id),
                amount = COALESCE($5, amount),
                donation_date = COALESCE($6, donation_date),
                payment_method = COALESCE($7, payment_method),
                notes = COALESCE($8, notes)
             WHERE id = $1 AND organization_id = $2
             RETURNING id",
        )
        .bind(id)
        .bind(organization_id)
        .bind(input.donor_id)
        .bind(input.purpose_id)
        .bind(input.amount)
        .bind(input.donation_date)
        .bind(&input.payment_method)
        .bind(&input.notes)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, organization_id, id).await,
            None => Ok(None),
        }
    }

    pub async fn delete(pool: &PgPool, organization_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM donations WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
