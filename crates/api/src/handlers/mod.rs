//! Request handlers, one module per resource.
//!
//! Handlers resolve the caller through an extractor from
//! [`crate::middleware`], delegate to the matching repository in
//! `parish_db`, and map errors via [`AppError`](crate::error::AppError).

pub mod assets;
pub mod audit;
pub mod auth;
pub mod departments;
pub mod donations;
pub mod donors;
pub mod expenses;
pub mod headquarters;
pub mod incomes;
pub mod members;
pub mod payroll;
pub mod programs;
pub mod reports;
pub mod roles;
pub mod staff;
pub mod users;
pub mod visitors;
