//! Payroll derivation: gross pay, PAYE, NAPSA and net pay.
//!
//! All amounts are monthly and rounded to two decimal places with
//! midpoint-away-from-zero rounding. The server always recomputes these
//! figures from the pay inputs; client-supplied totals are never stored.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::validation::{require_money, require_non_negative, MONEY_DECIMALS};

/// Round a monetary amount to [`MONEY_DECIMALS`] places.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

fn out_of_range(field: &str) -> CoreError {
    CoreError::Validation(format!("{field} is out of range"))
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// One PAYE band. Income up to `upper` (inclusive) above the previous band's
/// upper limit is taxed at `rate`. The last band has no upper limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxBand {
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

/// Statutory parameters for a payroll run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollRules {
    /// Marginal PAYE bands in ascending order.
    pub paye_bands: Vec<TaxBand>,
    /// Employee NAPSA contribution rate applied to gross pay.
    pub napsa_rate: Decimal,
    /// Monthly cap on the employee NAPSA contribution.
    pub napsa_ceiling: Decimal,
}

impl Default for PayrollRules {
    /// Monthly bands: 0% to 5,100; 20% to 7,100; 30% to 9,200; 37% above.
    /// NAPSA: 5% capped at 1,708.20.
    fn default() -> Self {
        Self {
            paye_bands: vec![
                TaxBand {
                    upper: Some(Decimal::new(5100, 0)),
                    rate: Decimal::ZERO,
                },
                TaxBand {
                    upper: Some(Decimal::new(7100, 0)),
                    rate: Decimal::new(20, 2),
                },
                TaxBand {
                    upper: Some(Decimal::new(9200, 0)),
                    rate: Decimal::new(30, 2),
                },
                TaxBand {
                    upper: None,
                    rate: Decimal::new(37, 2),
                },
            ],
            napsa_rate: Decimal::new(5, 2),
            napsa_ceiling: Decimal::new(170820, 2),
        }
    }
}

impl PayrollRules {
    /// Check that bands ascend, only the last band is open-ended, and rates
    /// lie in `[0, 1]`.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.paye_bands.is_empty() {
            return Err(CoreError::Validation("at least one PAYE band is required".into()));
        }
        let mut previous = Decimal::ZERO;
        let last = self.paye_bands.len() - 1;
        for (i, band) in self.paye_bands.iter().enumerate() {
            validate_rate(band.rate, "PAYE band rate")?;
            match band.upper {
                Some(upper) if upper <= previous => {
                    return Err(CoreError::Validation(
                        "PAYE band limits must be strictly ascending".into(),
                    ));
                }
                Some(upper) => previous = upper,
                None if i != last => {
                    return Err(CoreError::Validation(
                        "only the last PAYE band may be open-ended".into(),
                    ));
                }
                None => {}
            }
        }
        validate_rate(self.napsa_rate, "NAPSA rate")?;
        require_non_negative(self.napsa_ceiling, "NAPSA ceiling")
    }
}

fn validate_rate(rate: Decimal, field: &str) -> Result<(), CoreError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(CoreError::Validation(format!(
            "{field} must be between 0 and 1, got {rate}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Inputs / outputs
// ---------------------------------------------------------------------------

/// Amounts entered for one staff member for one month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayInputs {
    pub basic_salary: Decimal,
    #[serde(default)]
    pub housing_allowance: Decimal,
    #[serde(default)]
    pub transport_allowance: Decimal,
    #[serde(default)]
    pub other_allowances: Decimal,
    /// Loans, advances and similar non-statutory deductions.
    #[serde(default)]
    pub other_deductions: Decimal,
}

/// Derived payroll figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayBreakdown {
    pub gross_pay: Decimal,
    pub paye: Decimal,
    pub napsa: Decimal,
    pub other_deductions: Decimal,
    pub total_deductions: Decimal,
    pub net_pay: Decimal,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Sum of basic salary and all allowances. Fails instead of overflowing.
pub fn gross_pay(inputs: &PayInputs) -> Result<Decimal, CoreError> {
    [
        inputs.housing_allowance,
        inputs.transport_allowance,
        inputs.other_allowances,
    ]
    .into_iter()
    .try_fold(inputs.basic_salary, |acc, amount| acc.checked_add(amount))
    .map(round_money)
    .ok_or_else(|| out_of_range("gross_pay"))
}

/// Marginal PAYE on a monthly gross amount.
pub fn compute_paye(gross: Decimal, bands: &[TaxBand]) -> Decimal {
    let mut tax = Decimal::ZERO;
    let mut lower = Decimal::ZERO;
    for band in bands {
        if gross <= lower {
            break;
        }
        let top = match band.upper {
            Some(upper) => gross.min(upper),
            None => gross,
        };
        tax += (top - lower) * band.rate;
        match band.upper {
            Some(upper) => lower = upper,
            None => break,
        }
    }
    round_money(tax)
}

/// Employee NAPSA contribution: `rate * gross`, capped at `ceiling`.
pub fn compute_napsa(gross: Decimal, rate: Decimal, ceiling: Decimal) -> Decimal {
    round_money((gross * rate).min(ceiling))
}

/// Derive the full breakdown for one pay slip.
///
/// Inputs must be non-negative money amounts with at most two decimal
/// places, so the stored figures always add up. Fails when deductions
/// exceed gross pay or a total no longer fits a money column.
pub fn compute_pay(inputs: &PayInputs, rules: &PayrollRules) -> Result<PayBreakdown, CoreError> {
    require_non_negative(inputs.basic_salary, "basic_salary")?;
    require_non_negative(inputs.housing_allowance, "housing_allowance")?;
    require_non_negative(inputs.transport_allowance, "transport_allowance")?;
    require_non_negative(inputs.other_allowances, "other_allowances")?;
    require_non_negative(inputs.other_deductions, "other_deductions")?;

    let gross = gross_pay(inputs)?;
    require_money(gross, "gross_pay")?;
    let paye = compute_paye(gross, &rules.paye_bands);
    let napsa = compute_napsa(gross, rules.napsa_rate, rules.napsa_ceiling);
    let other_deductions = inputs.other_deductions;
    let total_deductions = paye
        .checked_add(napsa)
        .and_then(|sum| sum.checked_add(other_deductions))
        .ok_or_else(|| out_of_range("total_deductions"))?;
    let net = gross - total_deductions;

    if net < Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "deductions ({total_deductions}) exceed gross pay ({gross})"
        )));
    }

    Ok(PayBreakdown {
        gross_pay: gross,
        paye,
        napsa,
        other_deductions,
        total_deductions,
        net_pay: net,
    })
}

/// Validate a payroll period.
pub fn validate_period(year: i32, month: i32) -> Result<(), CoreError> {
    if !(1..=12).contains(&month) {
        return Err(CoreError::Validation(format!(
            "period_month must be between 1 and 12, got {month}"
        )));
    }
    if !(2000..=2100).contains(&year) {
        return Err(CoreError::Validation(format!(
            "period_year must be between 2000 and 2100, got {year}"
        )));
    }
    Ok(())
}
