//! Repository for the append-only `audit_logs` table.
//!
//! Entries are hash-chained per organization. Appends take a transaction-level
//! advisory lock keyed by the organization id so two concurrent writers cannot
//! both link to the same predecessor.

use parish_core::audit::{compute_integrity_hash, redact_sensitive_fields};
use parish_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use parish_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::audit::{AuditLog, AuditQuery, CreateAuditLog};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const COLUMNS: &str = "\
    id, organization_id, actor_kind, actor_id, action_type, entity_type, \
    entity_id, details_json, integrity_hash, created_at";

/// `$1` organization, `$2` action, `$3` entity type, `$4` entity id, `$5` actor.
const FILTER: &str = "WHERE organization_id = $1 \
                      AND ($2::TEXT IS NULL OR action_type = $2) \
                      AND ($3::TEXT IS NULL OR entity_type = $3) \
                      AND ($4::BIGINT IS NULL OR entity_id = $4) \
                      AND ($5::BIGINT IS NULL OR actor_id = $5)";

// ---------------------------------------------------------------------------
// AuditLogRepo
// ---------------------------------------------------------------------------

pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append an entry in its own transaction.
    pub async fn append(pool: &PgPool, entry: &CreateAuditLog) -> Result<AuditLog, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let log = Self::append_in_tx(&mut tx, entry).await?;
        tx.commit().await?;
        Ok(log)
    }

    /// Append an entry inside the caller's transaction, so the audited change
    /// and its log row commit or roll back together.
    ///
    /// Sensitive keys in `details_json` are redacted before hashing.
    pub async fn append_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        entry: &CreateAuditLog,
    ) -> Result<AuditLog, sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(entry.organization_id.unwrap_or(0))
            .execute(&mut **tx)
            .await?;

        let prev_hash: Option<String> = sqlx::query_scalar(
            "SELECT integrity_hash FROM audit_logs
             WHERE organization_id IS NOT DISTINCT FROM $1
             ORDER BY id DESC LIMIT 1",
        )
        .bind(entry.organization_id)
        .fetch_optional(&mut **tx)
        .await?;

        let redacted = CreateAuditLog {
            details_json: redact_sensitive_fields(&entry.details_json),
            ..entry.clone()
        };
        let hash = compute_integrity_hash(
            prev_hash.as_deref(),
            &redacted.chained_fields().canonical(),
        );

        let query = format!(
            "INSERT INTO audit_logs (organization_id, actor_kind, actor_id, action_type,
                                     entity_type, entity_id, details_json, integrity_hash)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(redacted.organization_id)
            .bind(&redacted.actor_kind)
            .bind(redacted.actor_id)
            .bind(&redacted.action_type)
            .bind(&redacted.entity_type)
            .bind(redacted.entity_id)
            .bind(&redacted.details_json)
            .bind(&hash)
            .fetch_one(&mut **tx)
            .await
    }

    /// Query a tenant's audit logs, newest first.
    pub async fn query(
        pool: &PgPool,
        organization_id: DbId,
        params: &AuditQuery,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs {FILTER}
             ORDER BY id DESC
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(organization_id)
            .bind(&params.action_type)
            .bind(&params.entity_type)
            .bind(params.entity_id)
            .bind(params.actor_id)
            .bind(clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Count audit logs matching the given filter (for pagination metadata).
    pub async fn count(
        pool: &PgPool,
        organization_id: DbId,
        params: &AuditQuery,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM audit_logs {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(organization_id)
            .bind(&params.action_type)
            .bind(&params.entity_type)
            .bind(params.entity_id)
            .bind(params.actor_id)
            .fetch_one(pool)
            .await
    }

    /// The whole chain of one organization in insertion order.
    pub async fn fetch_chain(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs WHERE organization_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }
}
