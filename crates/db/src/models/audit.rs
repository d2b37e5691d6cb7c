//! Audit log entity models and DTOs.
//!
//! Audit logs have no `updated_at` field (immutable records).

use parish_core::audit::ChainedFields;
use parish_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single audit log entry. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub organization_id: Option<DbId>,
    pub actor_kind: String,
    pub actor_id: DbId,
    pub action_type: String,
    pub entity_type: String,
    pub entity_id: Option<DbId>,
    pub details_json: serde_json::Value,
    pub integrity_hash: String,
    pub created_at: Timestamp,
}

impl AuditLog {
    /// The fields covered by this entry's integrity hash.
    pub fn chained_fields(&self) -> ChainedFields<'_> {
        ChainedFields {
            organization_id: self.organization_id,
            actor_kind: &self.actor_kind,
            actor_id: self.actor_id,
            action_type: &self.action_type,
            entity_type: &self.entity_type,
            entity_id: self.entity_id,
            details: &self.details_json,
        }
    }
}

/// Who performed an audited action.
#[derive(Debug, Clone, Copy)]
pub struct AuditActor<'a> {
    /// Principal kind (`user`, `organization`, `headquarters`).
    pub kind: &'a str,
    pub id: DbId,
}

/// DTO for appending an audit log entry. The integrity hash is computed by
/// the repository from the previous entry of the same organization.
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub organization_id: Option<DbId>,
    pub actor_kind: String,
    pub actor_id: DbId,
    pub action_type: String,
    pub entity_type: String,
    pub entity_id: Option<DbId>,
    pub details_json: serde_json::Value,
}

impl CreateAuditLog {
    pub fn new(
        organization_id: Option<DbId>,
        actor: AuditActor<'_>,
        action_type: &str,
        entity_type: &str,
        entity_id: Option<DbId>,
        details_json: serde_json::Value,
    ) -> Self {
        Self {
            organization_id,
            actor_kind: actor.kind.to_string(),
            actor_id: actor.id,
            action_type: action_type.to_string(),
            entity_type: entity_type.to_string(),
            entity_id,
            details_json,
        }
    }

    pub fn chained_fields(&self) -> ChainedFields<'_> {
        ChainedFields {
            organization_id: self.organization_id,
            actor_kind: &self.actor_kind,
            actor_id: self.actor_id,
            action_type: &self.action_type,
            entity_type: &self.entity_type,
            entity_id: self.entity_id,
            details: &self.details_json,
        }
    }
}

/// Filter parameters for querying audit logs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub action_type: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub actor_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
