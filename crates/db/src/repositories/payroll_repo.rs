//! Repository for the `payrolls` table.
//!
//! Every mutation runs in a transaction together with its audit-log entry.
//! Updates, status changes and deletes lock the row with `FOR UPDATE` before
//! checking its status, so a concurrent "mark as paid" cannot interleave
//! with an amount change.

use parish_core::audit::{action_types, entity_types};
use parish_core::error::CoreError;
use parish_core::pagination::{
    clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_EXPORT_ROWS, MAX_PAGE_LIMIT,
};
use parish_core::payroll::{compute_pay, PayBreakdown, PayInputs, PayrollRules};
use parish_core::status::{ACTIVE, PAID, PENDING};
use parish_core::types::{Date, DbId, Money};
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::audit::{AuditActor, CreateAuditLog};
use crate::models::payroll::{NewPayroll, Payroll, PayrollListParams};
use crate::repositories::AuditLogRepo;

const SELECT: &str = "SELECT p.id, p.organization_id, p.staff_id, \
                      s.first_name || ' ' || s.last_name AS staff_name, \
                      p.department_id, p.role_id, p.period_year, p.period_month, \
                      p.basic_salary, p.housing_allowance, p.transport_allowance, \
                      p.other_allowances, p.other_deductions, p.gross_pay, p.paye, p.napsa, \
                      p.net_pay, p.status, p.paid_at, p.created_at, p.updated_at \
                      FROM payrolls p \
                      JOIN staff s ON s.id = p.staff_id";

/// `$1` organization, `$2` year, `$3` month, `$4` status, `$5` staff, `$6` department.
const FILTER: &str = "WHERE p.organization_id = $1 \
                      AND ($2::INTEGER IS NULL OR p.period_year = $2) \
                      AND ($3::INTEGER IS NULL OR p.period_month = $3) \
                      AND ($4::TEXT IS NULL OR p.status = $4) \
                      AND ($5::BIGINT IS NULL OR p.staff_id = $5) \
                      AND ($6::BIGINT IS NULL OR p.department_id = $6)";

const INSERT: &str = "INSERT INTO payrolls (organization_id, staff_id, department_id, role_id, \
                      period_year, period_month, basic_salary, housing_allowance, \
                      transport_allowance, other_allowances, other_deductions, \
                      gross_pay, paye, napsa, net_pay, status) \
                      VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)";

/// Outcome of a mutation that first locks and inspects the row.
#[derive(Debug)]
pub enum LockedWrite<T> {
    Applied(T),
    NotFound,
    /// The row exists but the change is not allowed; nothing was written.
    Rejected(CoreError),
}

fn paid_conflict(id: DbId) -> CoreError {
    CoreError::Conflict(format!("Payroll {id} is already paid and cannot be modified"))
}

fn amounts_json(inputs: &PayInputs, breakdown: &PayBreakdown) -> serde_json::Value {
    json!({
        "basic_salary": inputs.basic_salary,
        "housing_allowance": inputs.housing_allowance,
        "transport_allowance": inputs.transport_allowance,
        "other_allowances": inputs.other_allowances,
        "other_deductions": inputs.other_deductions,
        "gross_pay": breakdown.gross_pay,
        "paye": breakdown.paye,
        "napsa": breakdown.napsa,
        "net_pay": breakdown.net_pay,
    })
}

pub struct PayrollRepo;

impl PayrollRepo {
    /// Insert a Pending payroll row and its audit entry.
    ///
    /// A second row for the same staff member and period fails with the
    /// `uq_payrolls_staff_period` unique violation.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &NewPayroll,
        actor: AuditActor<'_>,
    ) -> Result<Payroll, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let id = Self::insert_in_tx(&mut tx, organization_id, input).await?;

        AuditLogRepo::append_in_tx(
            &mut tx,
            &CreateAuditLog::new(
                Some(organization_id),
                actor,
                action_types::PAYROLL_CREATE,
                entity_types::PAYROLL,
                Some(id),
                json!({
                    "staff_id": input.staff_id,
                    "period_year": input.period_year,
                    "period_month": input.period_month,
                    "amounts": amounts_json(&input.inputs, &input.breakdown),
                }),
            ),
        )
        .await?;

        let payroll = Self::find_in_tx(&mut tx, organization_id, id, false)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        tx.commit().await?;
        Ok(payroll)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Payroll>, sqlx::Error> {
        let query = format!("{SELECT} WHERE p.id = $1 AND p.organization_id = $2");
        sqlx::query_as::<_, Payroll>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Newest periods first, then by staff name.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        params: &PayrollListParams,
    ) -> Result<Vec<Payroll>, sqlx::Error> {
        let query = format!(
            "{SELECT} {FILTER}
             ORDER BY p.period_year DESC, p.period_month DESC, staff_name ASC, p.id ASC
             LIMIT $7 OFFSET $8"
        );
        sqlx::query_as::<_, Payroll>(&query)
            .bind(organization_id)
            .bind(params.year)
            .bind(params.month)
            .bind(&params.status)
            .bind(params.staff_id)
            .bind(params.department_id)
            .bind(clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    pub async fn count(
        pool: &PgPool,
        organization_id: DbId,
        params: &PayrollListParams,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM payrolls p {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(organization_id)
            .bind(params.year)
            .bind(params.month)
            .bind(&params.status)
            .bind(params.staff_id)
            .bind(params.department_id)
            .fetch_one(pool)
            .await
    }

    /// Payroll rows whose period's first day falls in `[from, to]`.
    pub async fn export(
        pool: &PgPool,
        organization_id: DbId,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Vec<Payroll>, sqlx::Error> {
        let query = format!(
            "{SELECT} WHERE p.organization_id = $1
               AND ($2::DATE IS NULL OR make_date(p.period_year, p.period_month, 1) >= $2)
               AND ($3::DATE IS NULL OR make_date(p.period_year, p.period_month, 1) <= $3)
             ORDER BY p.period_year ASC, p.period_month ASC, staff_name ASC
             LIMIT $4"
        );
        sqlx::query_as::<_, Payroll>(&query)
            .bind(organization_id)
            .bind(from)
            .bind(to)
            .bind(MAX_EXPORT_ROWS)
            .fetch_all(pool)
            .await
    }

    /// Recompute and store a payroll's amounts.
    ///
    /// `recompute` receives the locked current row and returns the new inputs
    /// and their breakdown. A Paid row or a failing `recompute` leaves the
    /// row untouched.
    pub async fn update<F>(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        actor: AuditActor<'_>,
        recompute: F,
    ) -> Result<LockedWrite<Payroll>, sqlx::Error>
    where
        F: FnOnce(&Payroll) -> Result<(PayInputs, PayBreakdown), CoreError>,
    {
        let mut tx = pool.begin().await?;
        let Some(current) = Self::find_in_tx(&mut tx, organization_id, id, true).await? else {
            return Ok(LockedWrite::NotFound);
        };
        if current.status == PAID {
            return Ok(LockedWrite::Rejected(paid_conflict(id)));
        }
        let (inputs, breakdown) = match recompute(&current) {
            Ok(computed) => computed,
            Err(e) => return Ok(LockedWrite::Rejected(e)),
        };

        sqlx::query(
            "UPDATE payrolls SET
                basic_salary = $3, housing_allowance = $4, transport_allowance = $5,
                other_allowances = $6, other_deductions = $7,
                gross_pay = $8, paye = $9, napsa = $10, net_pay = $11
             WHERE id = $1 AND organization_id = $2",
        )
        .bind(id)
        .bind(organization_id)
        .bind(inputs.basic_salary)
        .bind(inputs.housing_allowance)
        .bind(inputs.transport_allowance)
        .bind(inputs.other_allowances)
        .bind(inputs.other_deductions)
        .bind(breakdown.gross_pay)
        .bind(breakdown.paye)
        .bind(breakdown.napsa)
        .bind(breakdown.net_pay)
        .execute(&mut *tx)
        .await?;

        AuditLogRepo::append_in_tx(
            &mut tx,
            &CreateAuditLog::new(
                Some(organization_id),
                actor,
                action_types::PAYROLL_UPDATE,
                entity_types::PAYROLL,
                Some(id),
                json!({
                    "before": amounts_json(&current.inputs(), &PayBreakdown {
                        gross_pay: current.gross_pay,
                        paye: current.paye,
                        napsa: current.napsa,
                        other_deductions: current.other_deductions,
                        total_deductions: current.paye + current.napsa + current.other_deductions,
                        net_pay: current.net_pay,
                    }),
                    "after": amounts_json(&inputs, &breakdown),
                }),
            ),
        )
        .await?;

        let updated = Self::find_in_tx(&mut tx, organization_id, id, false)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        tx.commit().await?;
        Ok(LockedWrite::Applied(updated))
    }

    /// Move a payroll between Pending and Paid, stamping or clearing
    /// `paid_at`. Setting the current status again is a no-op.
    pub async fn set_status(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        status: &str,
        actor: AuditActor<'_>,
    ) -> Result<LockedWrite<Payroll>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(current) = Self::find_in_tx(&mut tx, organization_id, id, true).await? else {
            return Ok(LockedWrite::NotFound);
        };
        if current.status == status {
            return Ok(LockedWrite::Applied(current));
        }

        sqlx::query(
            "UPDATE payrolls SET
                status = $3,
                paid_at = CASE WHEN $3 = 'Paid' THEN NOW() ELSE NULL END
             WHERE id = $1 AND organization_id = $2",
        )
        .bind(id)
        .bind(organization_id)
        .bind(status)
        .execute(&mut *tx)
        .await?;

        AuditLogRepo::append_in_tx(
            &mut tx,
            &CreateAuditLog::new(
                Some(organization_id),
                actor,
                action_types::PAYROLL_STATUS_CHANGE,
                entity_types::PAYROLL,
                Some(id),
                json!({ "from": current.status, "to": status }),
            ),
        )
        .await?;

        let updated = Self::find_in_tx(&mut tx, organization_id, id, false)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        tx.commit().await?;
        Ok(LockedWrite::Applied(updated))
    }

    /// Delete a Pending payroll. Paid payrolls are kept for the record.
    pub async fn delete(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        actor: AuditActor<'_>,
    ) -> Result<LockedWrite<()>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(current) = Self::find_in_tx(&mut tx, organization_id, id, true).await? else {
            return Ok(LockedWrite::NotFound);
        };
        if current.status == PAID {
            return Ok(LockedWrite::Rejected(paid_conflict(id)));
        }

        sqlx::query("DELETE FROM payrolls WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(&mut *tx)
            .await?;

        AuditLogRepo::append_in_tx(
            &mut tx,
            &CreateAuditLog::new(
                Some(organization_id),
                actor,
                action_types::PAYROLL_DELETE,
                entity_types::PAYROLL,
                Some(id),
                json!({
                    "staff_id": current.staff_id,
                    "period_year": current.period_year,
                    "period_month": current.period_month,
                    "net_pay": current.net_pay,
                }),
            ),
        )
        .await?;

        tx.commit().await?;
        Ok(LockedWrite::Applied(()))
    }

    /// Create Pending payroll for every Active staff member who has none for
    /// the period. Amounts come from the staff member's basic salary alone.
    ///
    /// Returns the created rows; staff that already had a row are skipped.
    pub async fn generate_for_period(
        pool: &PgPool,
        organization_id: DbId,
        period_year: i32,
        period_month: i32,
        rules: &PayrollRules,
        actor: AuditActor<'_>,
    ) -> Result<LockedWrite<Vec<Payroll>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let candidates: Vec<(DbId, Option<DbId>, Option<DbId>, Money)> =
            sqlx::query_as(
                "SELECT s.id, s.department_id, s.role_id, s.basic_salary
                 FROM staff s
                 WHERE s.organization_id = $1 AND s.status = $2
                   AND NOT EXISTS (
                       SELECT 1 FROM payrolls p
                       WHERE p.staff_id = s.id
                         AND p.period_year = $3 AND p.period_month = $4)
                 ORDER BY s.id ASC",
            )
            .bind(organization_id)
            .bind(ACTIVE)
            .bind(period_year)
            .bind(period_month)
            .fetch_all(&mut *tx)
            .await?;

        let mut created_ids = Vec::with_capacity(candidates.len());
        for (staff_id, department_id, role_id, basic_salary) in candidates {
            let inputs = PayInputs {
                basic_salary,
                ..Default::default()
            };
            let breakdown = match compute_pay(&inputs, rules) {
                Ok(b) => b,
                Err(e) => return Ok(LockedWrite::Rejected(e)),
            };
            let new = NewPayroll {
                staff_id,
                department_id,
                role_id,
                period_year,
                period_month,
                inputs,
                breakdown,
            };
            created_ids.push(Self::insert_in_tx(&mut tx, organization_id, &new).await?);
        }

        if !created_ids.is_empty() {
            AuditLogRepo::append_in_tx(
                &mut tx,
                &CreateAuditLog::new(
                    Some(organization_id),
                    actor,
                    action_types::PAYROLL_CREATE,
                    entity_types::PAYROLL,
                    None,
                    json!({
                        "generated": created_ids.len(),
                        "payroll_ids": created_ids,
                        "period_year": period_year,
                        "period_month": period_month,
                    }),
                ),
            )
            .await?;
        }

        let query =
            format!("{SELECT} WHERE p.organization_id = $1 AND p.id = ANY($2) ORDER BY p.id");
        let created = sqlx::query_as::<_, Payroll>(&query)
            .bind(organization_id)
            .bind(&created_ids)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(LockedWrite::Applied(created))
    }

    // -----------------------------------------------------------------------
    // Transaction helpers
    // -----------------------------------------------------------------------

    async fn insert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        organization_id: DbId,
        input: &NewPayroll,
    ) -> Result<DbId, sqlx::Error> {
        let query = format!("{INSERT} RETURNING id");
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(organization_id)
            .bind(input.staff_id)
            .bind(input.department_id)
            .bind(input.role_id)
            .bind(input.period_year)
            .bind(input.period_month)
            .bind(input.inputs.basic_salary)
            .bind(input.inputs.housing_allowance)
            .bind(input.inputs.transport_allowance)
            .bind(input.inputs.other_allowances)
            .bind(input.inputs.other_deductions)
            .bind(input.breakdown.gross_pay)
            .bind(input.breakdown.paye)
            .bind(input.breakdown.napsa)
            .bind(input.breakdown.net_pay)
            .bind(PENDING)
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch a row inside `tx`, optionally taking a row lock on the payroll
    /// (not on the joined staff row).
    async fn find_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        organization_id: DbId,
        id: DbId,
        lock: bool,
    ) -> Result<Option<Payroll>, sqlx::Error> {
        let lock_clause = if lock { "FOR UPDATE OF p" } else { "" };
        let query = format!("{SELECT} WHERE p.id = $1 AND p.organization_id = $2 {lock_clause}");
        sqlx::query_as::<_, Payroll>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(&mut **tx)
            .await
    }
}
