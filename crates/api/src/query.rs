//! Shared query parameter types for API handlers.

use parish_core::types::Date;
use serde::Deserialize;

/// Inclusive date range (`?from=&to=`), both ends optional.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeParams {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

/// Payroll period filter (`?year=&month=`).
#[derive(Debug, Default, Deserialize)]
pub struct PeriodParams {
    pub year: Option<i32>,
    pub month: Option<i32>,
}

/// Output format for export endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

/// Query parameters for `GET /reports/export/{dataset}`.
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub format: ExportFormat,
    pub from: Option<Date>,
    pub to: Option<Date>,
}
