//! Repository for the `roles`, `permissions` and `role_permissions` tables.

use parish_core::audit::{action_types, entity_types};
use parish_core::types::DbId;
use serde_json::json;
use sqlx::PgPool;

use crate::models::audit::{AuditActor, CreateAuditLog};
use crate::models::role::{CreateRole, Permission, Role, UpdateRole};
use crate::repositories::AuditLogRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, name, description, created_at, updated_at";

/// `$1` role id.
const PERMISSION_NAMES: &str = "SELECT p.name FROM role_permissions rp \
                                JOIN permissions p ON p.id = rp.permission_id \
                                WHERE rp.role_id = $1";

/// Provides CRUD operations for roles and their permission sets.
pub struct RoleRepo;

impl RoleRepo {
    /// Insert a role and its initial permission set in one transaction.
    ///
    /// Permission names must already be validated against the catalogue.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateRole,
    ) -> Result<Role, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO roles (organization_id, name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let role = sqlx::query_as::<_, Role>(&query)
            .bind(organization_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id)
             SELECT $1, id FROM permissions WHERE name = ANY($2)",
        )
        .bind(role.id)
        .bind(&input.permissions)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(role)
    }

    /// Find a role by id within a tenant.
    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List all roles of a tenant ordered by name.
    pub async fn list(pool: &PgPool, organization_id: DbId) -> Result<Vec<Role>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM roles WHERE organization_id = $1 ORDER BY name ASC");
        sqlx::query_as::<_, Role>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// Update a role. Returns `None` if no row with `id` exists in the tenant.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateRole,
    ) -> Result<Option<Role>, sqlx::Error> {
        let query = format!(
            "UPDATE roles SET
                name = COALESCE($3, name),
                description = COALESCE($4, description)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a role. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while users still hold the role.
    pub async fn delete(pool: &PgPool, organization_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permission names granted to a role, sorted.
    pub async fn permission_names(pool: &PgPool, role_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(&format!("{PERMISSION_NAMES} ORDER BY p.name"))
            .bind(role_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a role's permission set and record the change in the audit
    /// log, all in one transaction.
    ///
    /// Returns `None` when the role does not exist in the tenant.
    pub async fn set_permissions(
        pool: &PgPool,
        organization_id: DbId,
        role_id: DbId,
        names: &[String],
        actor: AuditActor<'_>,
    ) -> Result<Option<Vec<String>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let exists: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM roles WHERE id = $1 AND organization_id = $2 FOR UPDATE",
        )
        .bind(role_id)
        .bind(organization_id)
        .fetch_optional(&mut *tx)
        .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let before = sqlx::query_scalar::<_, String>(&format!("{PERMISSION_NAMES} ORDER BY p.name"))
            .bind(role_id)
            .fetch_all(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id)
             SELECT $1, id FROM permissions WHERE name = ANY($2)",
        )
        .bind(role_id)
        .bind(names)
        .execute(&mut *tx)
        .await?;

        let after = sqlx::query_scalar::<_, String>(&format!("{PERMISSION_NAMES} ORDER BY p.name"))
            .bind(role_id)
            .fetch_all(&mut *tx)
            .await?;

        AuditLogRepo::append_in_tx(
            &mut tx,
            &CreateAuditLog::new(
                Some(organization_id),
                actor,
                action_types::ROLE_PERMISSIONS_CHANGE,
                entity_types::ROLE,
                Some(role_id),
                json!({ "before": before, "after": after }),
            ),
        )
        .await?;

        tx.commit().await?;
        Ok(Some(after))
    }

    /// List the global permission catalogue.
    pub async fn list_permissions(pool: &PgPool) -> Result<Vec<Permission>, sqlx::Error> {
        sqlx::query_as::<_, Permission>(
            "SELECT id, name, description FROM permissions ORDER BY name ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Resolve a role ID to its name, returning `"unknown"` if the ID is missing.
    pub async fn resolve_name(pool: &PgPool, role_id: DbId) -> Result<String, sqlx::Error> {
        Ok(
            sqlx::query_scalar::<_, String>("SELECT name FROM roles WHERE id = $1")
                .bind(role_id)
                .fetch_optional(pool)
                .await?
                .unwrap_or_else(|| "unknown".to_string()),
        )
    }
}
