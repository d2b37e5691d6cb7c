//! Handlers for `/reports`: finance and payroll summaries, dashboard counts
//! and dataset exports.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use parish_core::csv::{opt, CsvWriter};
use parish_core::permissions::ReportsView;
use parish_core::reports::{merge_monthly, FinanceTotals, MonthlyFinance};
use parish_core::types::{Date, Money};
use parish_core::validation::validate_date_range;
use parish_db::models::report::{MonthlyAmount, PayrollStatusTotals};
use parish_db::repositories::{
    DonationRepo, ExpenseRepo, IncomeRepo, Ledger, MemberRepo, PayrollRepo, ReportRepo, StaffRepo,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequirePermission;
use crate::query::{DateRangeParams, ExportFormat, ExportParams, PeriodParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Finance
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct FinanceReport {
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub totals: FinanceTotals,
    pub monthly: Vec<MonthlyFinance>,
}

fn as_pairs(rows: Vec<MonthlyAmount>) -> Vec<(String, Money)> {
    rows.into_iter().map(|r| (r.month, r.amount)).collect()
}

/// GET /api/v1/reports/finance
///
/// Income, donation and expense totals for the range, with a per-month
/// breakdown. Net is `incomes + donations - expenses`.
pub async fn finance_report(
    RequirePermission(ctx, _): RequirePermission<ReportsView>,
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    validate_date_range(params.from, params.to)?;
    let org_id = ctx.organization_id()?;
    let (from, to) = (params.from, params.to);

    let incomes = ReportRepo::monthly_totals(&state.pool, org_id, Ledger::Incomes, from, to).await?;
    let donations =
        ReportRepo::monthly_totals(&state.pool, org_id, Ledger::Donations, from, to).await?;
    let expenses =
        ReportRepo::monthly_totals(&state.pool, org_id, Ledger::Expenses, from, to).await?;

    let monthly = merge_monthly(&as_pairs(incomes), &as_pairs(donations), &as_pairs(expenses));
    let totals = monthly.iter().fold(
        FinanceTotals::new(Money::ZERO, Money::ZERO, Money::ZERO),
        |acc, m| {
            FinanceTotals::new(
                acc.incomes + m.totals.incomes,
                acc.donations + m.totals.donations,
                acc.expenses + m.totals.expenses,
            )
        },
    );

    Ok(Json(DataResponse {
        data: FinanceReport {
            from,
            to,
            totals,
            monthly,
        },
    }))
}

// ---------------------------------------------------------------------------
// Payroll
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PayrollReport {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub count: i64,
    pub gross_pay: Money,
    pub paye: Money,
    pub napsa: Money,
    pub other_deductions: Money,
    pub net_pay: Money,
    pub by_status: Vec<PayrollStatusTotals>,
}

impl PayrollReport {
    fn from_status_totals(
        year: Option<i32>,
        month: Option<i32>,
        rows: Vec<PayrollStatusTotals>,
    ) -> Self {
        let mut report = Self {
            year,
            month,
            count: 0,
            gross_pay: Money::ZERO,
            paye: Money::ZERO,
            napsa: Money::ZERO,
            other_deductions: Money::ZERO,
            net_pay: Money::ZERO,
            by_status: Vec::new(),
        };
        for row in &rows {
            report.count += row.count;
            report.gross_pay += row.gross_pay;
            report.paye += row.paye;
            report.napsa += row.napsa;
            report.other_deductions += row.other_deductions;
            report.net_pay += row.net_pay;
        }
        report.by_status = rows;
        report
    }
}

/// GET /api/v1/reports/payroll
pub async fn payroll_report(
    RequirePermission(ctx, _): RequirePermission<ReportsView>,
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(month) = params.month {
        if !(1..=12).contains(&month) {
            return Err(AppError::BadRequest(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
    }
    let org_id = ctx.organization_id()?;
    let rows = ReportRepo::payroll_totals(&state.pool, org_id, params.year, params.month).await?;

    Ok(Json(DataResponse {
        data: PayrollReport::from_status_totals(params.year, params.month, rows),
    }))
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// GET /api/v1/reports/dashboard
pub async fn dashboard(
    RequirePermission(ctx, _): RequirePermission<ReportsView>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let counts = ReportRepo::dashboard_counts(&state.pool, ctx.organization_id()?).await?;

    Ok(Json(DataResponse { data: counts }))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Datasets available under `/reports/export/{dataset}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Members,
    Staff,
    Donations,
    Incomes,
    Expenses,
    Payroll,
}

impl Dataset {
    pub const ALL: &'static [&'static str] =
        &["members", "staff", "donations", "incomes", "expenses", "payroll"];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "members" => Some(Self::Members),
            "staff" => Some(Self::Staff),
            "donations" => Some(Self::Donations),
            "incomes" => Some(Self::Incomes),
            "expenses" => Some(Self::Expenses),
            "payroll" => Some(Self::Payroll),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Members => "members",
            Self::Staff => "staff",
            Self::Donations => "donations",
            Self::Incomes => "incomes",
            Self::Expenses => "expenses",
            Self::Payroll => "payroll",
        }
    }
}

/// GET /api/v1/reports/export/{dataset}
///
/// `format=csv` (default) returns an attachment; `format=json` returns the
/// rows in the usual envelope. `from`/`to` apply to the dated ledgers and to
/// payroll periods; members and staff are exported whole.
pub async fn export_dataset(
    RequirePermission(ctx, _): RequirePermission<ReportsView>,
    State(state): State<AppState>,
    Path(dataset): Path<String>,
    Query(params): Query<ExportParams>,
) -> AppResult<Response> {
    let dataset = Dataset::parse(&dataset).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unknown dataset '{dataset}'. Expected one of: {}",
            Dataset::ALL.join(", ")
        ))
    })?;
    validate_date_range(params.from, params.to)?;

    let org_id = ctx.organization_id()?;
    let (from, to) = (params.from, params.to);
    let pool = &state.pool;

    let response = match (dataset, params.format) {
        (Dataset::Members, ExportFormat::Json) => json_rows(MemberRepo::export(pool, org_id).await?),
        (Dataset::Members, ExportFormat::Csv) => {
            let rows = MemberRepo::export(pool, org_id).await?;
            let mut csv = CsvWriter::with_header(&[
                "id", "first_name", "last_name", "email", "phone", "gender",
                "date_of_birth", "address", "join_date", "status",
            ]);
            for m in &rows {
                csv.push_record([
                    m.id.to_string(),
                    m.first_name.clone(),
                    m.last_name.clone(),
                    opt(&m.email),
                    opt(&m.phone),
                    opt(&m.gender),
                    opt(&m.date_of_birth),
                    opt(&m.address),
                    opt(&m.join_date),
                    m.status.clone(),
                ]);
            }
            csv_attachment(dataset, csv)
        }
        (Dataset::Staff, ExportFormat::Json) => json_rows(StaffRepo::export(pool, org_id).await?),
        (Dataset::Staff, ExportFormat::Csv) => {
            let rows = StaffRepo::export(pool, org_id).await?;
            let mut csv = CsvWriter::with_header(&[
                "id", "first_name", "last_name", "email", "phone", "position",
                "department_id", "basic_salary", "hire_date", "status",
            ]);
            for s in &rows {
                csv.push_record([
                    s.id.to_string(),
                    s.first_name.clone(),
                    s.last_name.clone(),
                    opt(&s.email),
                    opt(&s.phone),
                    opt(&s.position),
                    opt(&s.department_id),
                    s.basic_salary.to_string(),
                    opt(&s.hire_date),
                    s.status.clone(),
                ]);
            }
            csv_attachment(dataset, csv)
        }
        (Dataset::Donations, ExportFormat::Json) => {
            json_rows(DonationRepo::export(pool, org_id, from, to).await?)
        }
        (Dataset::Donations, ExportFormat::Csv) => {
            let rows = DonationRepo::export(pool, org_id, from, to).await?;
            let mut csv = CsvWriter::with_header(&[
                "id", "donation_date", "donor", "purpose", "amount", "payment_method", "notes",
            ]);
            for d in &rows {
                csv.push_record([
                    d.id.to_string(),
                    d.donation_date.to_string(),
                    d.donor_name.clone(),
                    opt(&d.purpose_name),
                    d.amount.to_string(),
                    opt(&d.payment_method),
                    opt(&d.notes),
                ]);
            }
            csv_attachment(dataset, csv)
        }
        (Dataset::Incomes, ExportFormat::Json) => {
            json_rows(IncomeRepo::export(pool, org_id, from, to).await?)
        }
        (Dataset::Incomes, ExportFormat::Csv) => {
            let rows = IncomeRepo::export(pool, org_id, from, to).await?;
            let mut csv =
                CsvWriter::with_header(&["id", "income_date", "source", "amount", "description"]);
            for i in &rows {
                csv.push_record([
                    i.id.to_string(),
                    i.income_date.to_string(),
                    i.source.clone(),
                    i.amount.to_string(),
                    opt(&i.description),
                ]);
            }
            csv_attachment(dataset, csv)
        }
        (Dataset::Expenses, ExportFormat::Json) => {
            json_rows(ExpenseRepo::export(pool, org_id, from, to).await?)
        }
        (Dataset::Expenses, ExportFormat::Csv) => {
            let rows = ExpenseRepo::export(pool, org_id, from, to).await?;
            let mut csv = CsvWriter::with_header(&[
                "id", "expense_date", "category", "department_id", "amount", "description",
            ]);
            for e in &rows {
                csv.push_record([
                    e.id.to_string(),
                    e.expense_date.to_string(),
                    e.category.clone(),
                    opt(&e.department_id),
                    e.amount.to_string(),
                    opt(&e.description),
                ]);
            }
            csv_attachment(dataset, csv)
        }
        (Dataset::Payroll, ExportFormat::Json) => {
            json_rows(PayrollRepo::export(pool, org_id, from, to).await?)
        }
        (Dataset::Payroll, ExportFormat::Csv) => {
            let rows = PayrollRepo::export(pool, org_id, from, to).await?;
            let mut csv = CsvWriter::with_header(&[
                "id", "period", "staff", "basic_salary", "housing_allowance",
                "transport_allowance", "other_allowances", "gross_pay", "paye", "napsa",
                "other_deductions", "net_pay", "status", "paid_at",
            ]);
            for p in &rows {
                csv.push_record([
                    p.id.to_string(),
                    format!("{:04}-{:02}", p.period_year, p.period_month),
                    p.staff_name.clone(),
                    p.basic_salary.to_string(),
                    p.housing_allowance.to_string(),
                    p.transport_allowance.to_string(),
                    p.other_allowances.to_string(),
                    p.gross_pay.to_string(),
                    p.paye.to_string(),
                    p.napsa.to_string(),
                    p.other_deductions.to_string(),
                    p.net_pay.to_string(),
                    p.status.clone(),
                    opt(&p.paid_at.map(|t| t.to_rfc3339())),
                ]);
            }
            csv_attachment(dataset, csv)
        }
    };

    tracing::info!(
        organization_id = org_id,
        dataset = dataset.name(),
        format = ?params.format,
        "Dataset exported",
    );

    Ok(response)
}

fn json_rows<T: Serialize>(rows: Vec<T>) -> Response {
    Json(DataResponse { data: rows }).into_response()
}

fn csv_attachment(dataset: Dataset, csv: CsvWriter) -> Response {
    let filename = format!(
        "{}-{}.csv",
        dataset.name(),
        chrono::Utc::now().format("%Y%m%d")
    );
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv.finish(),
    )
        .into_response()
}
