//! Authentication and authorization extractors.
//!
//! - [`auth::AuthContext`] -- resolves a Bearer token into the caller's tenant
//!   context.
//! - [`rbac::RequirePermission`] -- requires one catalogue permission.
//! - [`rbac::RequireOrganizationOwner`] -- organization or headquarters tokens.
//! - [`rbac::RequireHeadquarters`] -- headquarters tokens only.

pub mod auth;
pub mod rbac;
