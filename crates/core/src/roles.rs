//! Well-known role name constants.
//!
//! `admin` is seeded for every organization on registration and implicitly
//! holds every permission.

pub const ROLE_ADMIN: &str = "admin";
