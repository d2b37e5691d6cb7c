//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Tenant tables always take the
//! caller's `organization_id`, so a row of another tenant reads as missing.

pub mod asset_repo;
pub mod audit_repo;
pub mod department_repo;
pub mod donation_repo;
pub mod donor_repo;
pub mod expense_repo;
pub mod income_repo;
pub mod member_repo;
pub mod organization_repo;
pub mod payroll_repo;
pub mod program_repo;
pub mod report_repo;
pub mod role_repo;
pub mod staff_repo;
pub mod user_repo;
pub mod visitor_repo;

pub use asset_repo::AssetRepo;
pub use audit_repo::AuditLogRepo;
pub use department_repo::DepartmentRepo;
pub use donation_repo::DonationRepo;
pub use donor_repo::{DonationPurposeRepo, DonorRepo};
pub use expense_repo::ExpenseRepo;
pub use income_repo::IncomeRepo;
pub use member_repo::MemberRepo;
pub use organization_repo::{HeadquartersRepo, OrganizationRepo};
pub use payroll_repo::{LockedWrite, PayrollRepo};
pub use program_repo::ProgramRepo;
pub use report_repo::{Ledger, ReportRepo};
pub use role_repo::RoleRepo;
pub use staff_repo::StaffRepo;
pub use user_repo::UserRepo;
pub use visitor_repo::VisitorRepo;
