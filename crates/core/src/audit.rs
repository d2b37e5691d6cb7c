//! Audit logging constants and hash-chain utilities.
//!
//! Audit entries of one organization form a chain: each entry's
//! `integrity_hash` covers the previous entry's hash plus the entry's own
//! canonical content, so editing or deleting a row breaks every later link.

use sha2::{Digest, Sha256};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Action type constants
// ---------------------------------------------------------------------------

/// Known action types for audit log entries.
pub mod action_types {
    pub const PAYROLL_CREATE: &str = "payroll_create";
    pub const PAYROLL_UPDATE: &str = "payroll_update";
    pub const PAYROLL_STATUS_CHANGE: &str = "payroll_status_change";
    pub const PAYROLL_DELETE: &str = "payroll_delete";
    pub const ROLE_PERMISSIONS_CHANGE: &str = "role_permissions_change";
    pub const USER_CREATE: &str = "user_create";
    pub const USER_UPDATE: &str = "user_update";
    pub const USER_PASSWORD_RESET: &str = "user_password_reset";
    pub const USER_DELETE: &str = "user_delete";
}

/// Entity type names recorded alongside an action.
pub mod entity_types {
    pub const PAYROLL: &str = "payroll";
    pub const ROLE: &str = "role";
    pub const USER: &str = "user";
}

// ---------------------------------------------------------------------------
// Integrity hash computation
// ---------------------------------------------------------------------------

/// Known seed value for the first entry in a chain.
const CHAIN_SEED: &str = "PARISH_AUDIT_CHAIN_SEED_V1";

/// The fields of an entry covered by its integrity hash.
#[derive(Debug, Clone, Copy)]
pub struct ChainedFields<'a> {
    pub organization_id: Option<DbId>,
    pub actor_kind: &'a str,
    pub actor_id: DbId,
    pub action_type: &'a str,
    pub entity_type: &'a str,
    pub entity_id: Option<DbId>,
    pub details: &'a serde_json::Value,
}

impl ChainedFields<'_> {
    /// Canonical string form. `serde_json` renders object keys in sorted
    /// order, so the same details always produce the same string.
    pub fn canonical(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.organization_id.map(|id| id.to_string()).unwrap_or_default(),
            self.actor_kind,
            self.actor_id,
            self.action_type,
            self.entity_type,
            self.entity_id.map(|id| id.to_string()).unwrap_or_default(),
            self.details,
        )
    }
}

/// Compute the SHA-256 integrity hash for an audit log entry.
///
/// `prev_hash` is the integrity_hash of the previous entry, or `None` for the
/// first entry in the chain (which uses a known seed value).
pub fn compute_integrity_hash(prev_hash: Option<&str>, entry_data: &str) -> String {
    let prev = prev_hash.unwrap_or(CHAIN_SEED);
    let digest = Sha256::digest(format!("{prev}|{entry_data}").as_bytes());
    format!("{digest:x}")
}

/// Result of walking a chain.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ChainVerification {
    pub verified: i64,
    /// Id of the first entry whose stored hash does not match.
    pub first_broken_id: Option<DbId>,
}

impl ChainVerification {
    pub fn is_intact(&self) -> bool {
        self.first_broken_id.is_none()
    }
}

/// Verify `(id, fields, stored_hash)` triples in insertion order.
pub fn verify_chain<'a, I>(entries: I) -> ChainVerification
where
    I: IntoIterator<Item = (DbId, ChainedFields<'a>, &'a str)>,
{
    let mut prev: Option<String> = None;
    let mut verified = 0;
    for (id, fields, stored) in entries {
        let expected = compute_integrity_hash(prev.as_deref(), &fields.canonical());
        if expected != stored {
            return ChainVerification {
                verified,
                first_broken_id: Some(id),
            };
        }
        verified += 1;
        prev = Some(expected);
    }
    ChainVerification {
        verified,
        first_broken_id: None,
    }
}

// ---------------------------------------------------------------------------
// Sensitive field redaction
// ---------------------------------------------------------------------------

/// Fields that should be redacted from audit log details before storage.
pub const SENSITIVE_FIELDS: &[&str] = &["password", "token", "secret", "authorization"];

/// Redact sensitive fields from a JSON value, recursing into nested objects
/// and arrays.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let lower_key = key.to_lowercase();
                if SENSITIVE_FIELDS.iter().any(|f| lower_key.contains(f)) {
                    redacted.insert(
                        key.clone(),
                        serde_json::Value::String("[REDACTED]".to_string()),
                    );
                } else {
                    redacted.insert(key.clone(), redact_sensitive_fields(val));
                }
            }
            serde_json::Value::Object(redacted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}
