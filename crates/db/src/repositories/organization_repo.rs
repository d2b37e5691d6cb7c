//! Repository for the `headquarters` and `organizations` tables.

use parish_core::roles::ROLE_ADMIN;
use parish_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::{CreateAccount, Headquarters, Organization, UpdateAccount};

const HQ_COLUMNS: &str = "id, name, email, password_hash, phone, address, is_active, \
                          created_at, updated_at";

const ORG_COLUMNS: &str = "id, headquarters_id, name, email, password_hash, phone, address, \
                           is_active, created_at, updated_at";

/// Provides CRUD operations for headquarters accounts.
pub struct HeadquartersRepo;

impl HeadquartersRepo {
    pub async fn create(pool: &PgPool, input: &CreateAccount) -> Result<Headquarters, sqlx::Error> {
        let query = format!(
            "INSERT INTO headquarters (name, email, password_hash, phone, address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {HQ_COLUMNS}"
        );
        sqlx::query_as::<_, Headquarters>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Headquarters>, sqlx::Error> {
        let query = format!("SELECT {HQ_COLUMNS} FROM headquarters WHERE id = $1");
        sqlx::query_as::<_, Headquarters>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Headquarters>, sqlx::Error> {
        let query = format!("SELECT {HQ_COLUMNS} FROM headquarters WHERE email = $1");
        sqlx::query_as::<_, Headquarters>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}

/// Provides CRUD operations for organizations (tenants).
pub struct OrganizationRepo;

impl OrganizationRepo {
    /// Insert an organization together with its `admin` role holding every
    /// permission in the catalogue, in one transaction.
    pub async fn create_with_admin_role(
        pool: &PgPool,
        headquarters_id: Option<DbId>,
        input: &CreateAccount,
    ) -> Result<Organization, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO organizations (headquarters_id, name, email, password_hash, phone, address)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ORG_COLUMNS}"
        );
        let org = sqlx::query_as::<_, Organization>(&query)
            .bind(headquarters_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.phone)
            .bind(&input.address)
            .fetch_one(&mut *tx)
            .await?;

        let role_id: DbId = sqlx::query_scalar(
            "INSERT INTO roles (organization_id, name, description)
             VALUES ($1, $2, 'Full access') RETURNING id",
        )
        .bind(org.id)
        .bind(ROLE_ADMIN)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id)
             SELECT $1, id FROM permissions",
        )
        .bind(role_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(org)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!("SELECT {ORG_COLUMNS} FROM organizations WHERE id = $1");
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!("SELECT {ORG_COLUMNS} FROM organizations WHERE email = $1");
        sqlx::query_as::<_, Organization>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find an organization only if it belongs to the given headquarters.
    pub async fn find_owned_by(
        pool: &PgPool,
        headquarters_id: DbId,
        id: DbId,
    ) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!(
            "SELECT {ORG_COLUMNS} FROM organizations WHERE id = $1 AND headquarters_id = $2"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .bind(headquarters_id)
            .fetch_optional(pool)
            .await
    }

    /// List every organization owned by a headquarters, by name.
    pub async fn list_for_headquarters(
        pool: &PgPool,
        headquarters_id: DbId,
    ) -> Result<Vec<Organization>, sqlx::Error> {
        let query = format!(
            "SELECT {ORG_COLUMNS} FROM organizations WHERE headquarters_id = $1 ORDER BY name ASC"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(headquarters_id)
            .fetch_all(pool)
            .await
    }

    /// Update profile fields of an organization owned by `headquarters_id`.
    /// Returns `None` if no such row exists.
    pub async fn update_owned_by(
        pool: &PgPool,
        headquarters_id: DbId,
        id: DbId,
        input: &UpdateAccount,
    ) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!(
            "UPDATE organizations SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                is_active = COALESCE($5, is_active)
             WHERE id = $1 AND headquarters_id = $6
             RETURNING {ORG_COLUMNS}"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(input.is_active)
            .bind(headquarters_id)
            .fetch_optional(pool)
            .await
    }
}
