//! Row models and request DTOs, one module per table family.

pub mod asset;
pub mod audit;
pub mod department;
pub mod donation;
pub mod donor;
pub mod expense;
pub mod income;
pub mod member;
pub mod organization;
pub mod payroll;
pub mod program;
pub mod report;
pub mod role;
pub mod staff;
pub mod user;
pub mod visitor;

use serde::Serialize;

/// One page of a list endpoint plus the unpaginated total.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
}
