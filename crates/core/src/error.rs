use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A headquarters principal called a tenant-scoped endpoint without
    /// selecting one of its organizations.
    #[error("Organization context required: {0}")]
    OrganizationRequired(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
