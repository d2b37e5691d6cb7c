//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access-token generation and validation.

pub mod jwt;
pub mod password;

/// Minimum password length for every account kind.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Consecutive failed user logins before the account is locked.
pub const MAX_FAILED_LOGINS: i32 = 5;

/// How long a locked user account stays locked.
pub const LOCKOUT_MINUTES: i64 = 15;
