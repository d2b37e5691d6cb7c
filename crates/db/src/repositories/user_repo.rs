//! Repository for the `users` table.
//!
//! Account changes made by another principal are written in one transaction
//! together with their audit-log entry.

use parish_core::audit::{action_types, entity_types};
use parish_core::types::{DbId, Timestamp};
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::audit::{AuditActor, CreateAuditLog};
use crate::models::user::{CreateUser, UpdateUser, User, UserResponse};
use crate::repositories::AuditLogRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, role_id, full_name, email, password_hash, is_active, \
                       failed_login_count, locked_until, last_login_at, created_at, updated_at";

/// Public columns joined with the role name.
const RESPONSE_COLUMNS: &str = "u.id, u.organization_id, u.role_id, r.name AS role, u.full_name, \
                                u.email, u.is_active, u.last_login_at, u.created_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user and its audit entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateUser,
        actor: AuditActor<'_>,
    ) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO users (organization_id, role_id, full_name, email, password_hash)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(input.organization_id)
            .bind(input.role_id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(&mut *tx)
            .await?;

        Self::audit_in_tx(
            &mut tx,
            input.organization_id,
            actor,
            action_types::USER_CREATE,
            user.id,
            json!({ "email": user.email, "role_id": user.role_id }),
        )
        .await?;
        tx.commit().await?;
        Ok(user)
    }

    /// Find a user by internal ID regardless of tenant (token resolution).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (stored lowercase).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Public view of one user within a tenant.
    pub async fn find_response(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<UserResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {RESPONSE_COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id
             WHERE u.id = $1 AND u.organization_id = $2"
        );
        sqlx::query_as::<_, UserResponse>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List a tenant's users, most recently created first.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<UserResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {RESPONSE_COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id
             WHERE u.organization_id = $1
             ORDER BY u.created_at DESC, u.id DESC"
        );
        sqlx::query_as::<_, UserResponse>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// Update a user and record the change. Only non-`None` fields in
    /// `input` are applied.
    ///
    /// Returns `false` if no row with the given `id` exists in the tenant.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateUser,
        actor: AuditActor<'_>,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query(
            "UPDATE users SET
                full_name = COALESCE($3, full_name),
                email = COALESCE($4, email),
                role_id = COALESCE($5, role_id),
                is_active = COALESCE($6, is_active)
             WHERE id = $1 AND organization_id = $2",
        )
        .bind(id)
        .bind(organization_id)
        .bind(&input.full_name)
        .bind(&input.email)
        .bind(input.role_id)
        .bind(input.is_active)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        Self::audit_in_tx(
            &mut tx,
            organization_id,
            actor,
            action_types::USER_UPDATE,
            id,
            json!({
                "full_name": input.full_name,
                "email": input.email,
                "role_id": input.role_id,
                "is_active": input.is_active,
            }),
        )
        .await?;
        tx.commit().await?;
        Ok(true)
    }

    /// Delete a user and record it. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        actor: AuditActor<'_>,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        Self::audit_in_tx(
            &mut tx,
            organization_id,
            actor,
            action_types::USER_DELETE,
            id,
            json!({}),
        )
        .await?;
        tx.commit().await?;
        Ok(true)
    }

    /// Count one failed login. The attempt that reaches `max_failures` locks
    /// the account until `lock_until` and starts the count again from zero,
    /// so failures after an expired lock are counted afresh.
    ///
    /// Returns `true` when this attempt locked the account.
    pub async fn record_failed_login(
        pool: &PgPool,
        id: DbId,
        max_failures: i32,
        lock_until: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "UPDATE users SET
                failed_login_count = CASE
                    WHEN failed_login_count + 1 >= $2 THEN 0
                    ELSE failed_login_count + 1
                END,
                locked_until = CASE
                    WHEN failed_login_count + 1 >= $2 THEN $3
                    ELSE locked_until
                END
             WHERE id = $1
             RETURNING failed_login_count = 0",
        )
        .bind(id)
        .bind(max_failures)
        .bind(lock_until)
        .fetch_one(pool)
        .await
    }

    /// Record a successful login: reset `failed_login_count` to 0, clear `locked_until`,
    /// and set `last_login_at` to now.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Update a user's password hash within a tenant and clear any lockout.
    /// Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        password_hash: &str,
        actor: AuditActor<'_>,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query(
            "UPDATE users SET password_hash = $3, failed_login_count = 0, locked_until = NULL
             WHERE id = $1 AND organization_id = $2",
        )
        .bind(id)
        .bind(organization_id)
        .bind(password_hash)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        Self::audit_in_tx(
            &mut tx,
            organization_id,
            actor,
            action_types::USER_PASSWORD_RESET,
            id,
            json!({}),
        )
        .await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn audit_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        organization_id: DbId,
        actor: AuditActor<'_>,
        action: &str,
        user_id: DbId,
        details: serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        AuditLogRepo::append_in_tx(
            tx,
            &CreateAuditLog::new(
                Some(organization_id),
                actor,
                action,
                entity_types::USER,
                Some(user_id),
                details,
            ),
        )
        .await?;
        Ok(())
    }
}
