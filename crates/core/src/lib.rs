//! Domain types and pure logic shared by the database and API layers.
//!
//! Nothing in this crate performs I/O.

pub mod audit;
pub mod csv;
pub mod error;
pub mod pagination;
pub mod payroll;
pub mod permissions;
pub mod principal;
pub mod reports;
pub mod roles;
pub mod status;
pub mod types;
pub mod validation;
