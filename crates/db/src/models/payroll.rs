//! Payroll record model and DTOs.
//!
//! Computed columns (`gross_pay`, `paye`, `napsa`, `net_pay`) are always
//! derived by `parish_core::payroll::compute_pay` before a write.

use parish_core::payroll::{PayBreakdown, PayInputs};
use parish_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A payroll row joined with the staff member's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payroll {
    pub id: DbId,
    pub organization_id: DbId,
    pub staff_id: DbId,
    pub staff_name: String,
    pub department_id: Option<DbId>,
    pub role_id: Option<DbId>,
    pub period_year: i32,
    pub period_month: i32,
    pub basic_salary: Money,
    pub housing_allowance: Money,
    pub transport_allowance: Money,
    pub other_allowances: Money,
    pub other_deductions: Money,
    pub gross_pay: Money,
    pub paye: Money,
    pub napsa: Money,
    pub net_pay: Money,
    pub status: String,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Payroll {
    /// The stored pay inputs, for recomputation after a partial update.
    pub fn inputs(&self) -> PayInputs {
        PayInputs {
            basic_salary: self.basic_salary,
            housing_allowance: self.housing_allowance,
            transport_allowance: self.transport_allowance,
            other_allowances: self.other_allowances,
            other_deductions: self.other_deductions,
        }
    }
}

/// Request body for `POST /payroll`.
#[derive(Debug, Deserialize)]
pub struct CreatePayrollRequest {
    pub staff_id: DbId,
    pub period_year: i32,
    pub period_month: i32,
    /// Defaults to the staff member's current basic salary.
    pub basic_salary: Option<Money>,
    #[serde(default)]
    pub housing_allowance: Money,
    #[serde(default)]
    pub transport_allowance: Money,
    #[serde(default)]
    pub other_allowances: Money,
    #[serde(default)]
    pub other_deductions: Money,
}

/// Fully resolved insert DTO.
#[derive(Debug, Clone)]
pub struct NewPayroll {
    pub staff_id: DbId,
    pub department_id: Option<DbId>,
    pub role_id: Option<DbId>,
    pub period_year: i32,
    pub period_month: i32,
    pub inputs: PayInputs,
    pub breakdown: PayBreakdown,
}

/// Request body for `PUT /payroll/{id}`. Absent amounts keep their values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePayroll {
    pub basic_salary: Option<Money>,
    pub housing_allowance: Option<Money>,
    pub transport_allowance: Option<Money>,
    pub other_allowances: Option<Money>,
    pub other_deductions: Option<Money>,
}

impl UpdatePayroll {
    /// Overlay the provided amounts on `current`.
    pub fn apply_to(&self, current: &PayInputs) -> PayInputs {
        PayInputs {
            basic_salary: self.basic_salary.unwrap_or(current.basic_salary),
            housing_allowance: self.housing_allowance.unwrap_or(current.housing_allowance),
            transport_allowance: self
                .transport_allowance
                .unwrap_or(current.transport_allowance),
            other_allowances: self.other_allowances.unwrap_or(current.other_allowances),
            other_deductions: self.other_deductions.unwrap_or(current.other_deductions),
        }
    }
}

/// Request body for `PATCH /payroll/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdatePayrollStatus {
    pub status: String,
}

/// Request body for `POST /payroll/generate`.
#[derive(Debug, Deserialize)]
pub struct GeneratePayroll {
    pub period_year: i32,
    pub period_month: i32,
}

/// Query parameters for `GET /payroll`.
#[derive(Debug, Default, Deserialize)]
pub struct PayrollListParams {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub status: Option<String>,
    pub staff_id: Option<DbId>,
    pub department_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
