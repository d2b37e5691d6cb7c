//! Allowed status strings per resource.
//!
//! Statuses are stored as plain `TEXT` columns; these lists are the only
//! values the API accepts.

use crate::error::CoreError;

pub const ACTIVE: &str = "Active";
pub const INACTIVE: &str = "Inactive";

/// Staff and member records.
pub const PERSON_STATUSES: &[&str] = &[ACTIVE, INACTIVE];

pub const DISPOSED: &str = "Disposed";

/// Fixed assets.
pub const ASSET_STATUSES: &[&str] = &[ACTIVE, INACTIVE, DISPOSED];

pub const PLANNED: &str = "Planned";
pub const COMPLETED: &str = "Completed";
pub const CANCELLED: &str = "Cancelled";

/// Church programs and events.
pub const PROGRAM_STATUSES: &[&str] = &[PLANNED, ACTIVE, COMPLETED, CANCELLED];

pub const PENDING: &str = "Pending";
pub const PAID: &str = "Paid";

/// Payroll records.
pub const PAYROLL_STATUSES: &[&str] = &[PENDING, PAID];

/// Ensure `value` is one of `allowed`.
pub fn validate_status(value: &str, allowed: &[&str], field: &str) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be one of: {}",
            allowed.join(", ")
        )))
    }
}

/// Validate an optional status, accepting `None`.
pub fn validate_optional_status(
    value: Option<&str>,
    allowed: &[&str],
    field: &str,
) -> Result<(), CoreError> {
    match value {
        Some(v) => validate_status(v, allowed, field),
        None => Ok(()),
    }
}
