//! Report aggregation helpers.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

/// Income, donation and expense totals for a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceTotals {
    pub incomes: Decimal,
    pub donations: Decimal,
    pub expenses: Decimal,
    /// `incomes + donations - expenses`.
    pub net: Decimal,
}

impl FinanceTotals {
    pub fn new(incomes: Decimal, donations: Decimal, expenses: Decimal) -> Self {
        Self {
            incomes,
            donations,
            expenses,
            net: incomes + donations - expenses,
        }
    }
}

/// Totals for one calendar month, keyed `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyFinance {
    pub month: String,
    #[serde(flatten)]
    pub totals: FinanceTotals,
}

/// Merge per-month sums from the three ledgers into one sorted breakdown.
///
/// A month missing from a ledger counts as zero for it.
pub fn merge_monthly(
    incomes: &[(String, Decimal)],
    donations: &[(String, Decimal)],
    expenses: &[(String, Decimal)],
) -> Vec<MonthlyFinance> {
    let mut months: BTreeMap<&str, [Decimal; 3]> = BTreeMap::new();
    for (slot, ledger) in [incomes, donations, expenses].into_iter().enumerate() {
        for (month, amount) in ledger {
            months.entry(month.as_str()).or_insert([Decimal::ZERO; 3])[slot] += *amount;
        }
    }
    months
        .into_iter()
        .map(|(month, [inc, don, exp])| MonthlyFinance {
            month: month.to_string(),
            totals: FinanceTotals::new(inc, don, exp),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn net_is_income_plus_donations_minus_expenses() {
        let totals = FinanceTotals::new(dec!(1000), dec!(250.50), dec!(400));
        assert_eq!(totals.net, dec!(850.50));
    }

    #[test]
    fn merges_and_sorts_months() {
        let incomes = vec![("2024-02".to_string(), dec!(100))];
        let donations = vec![
            ("2024-01".to_string(), dec!(50)),
            ("2024-02".to_string(), dec!(25)),
        ];
        let expenses = vec![("2024-03".to_string(), dec!(10))];

        let merged = merge_monthly(&incomes, &donations, &expenses);
        let months: Vec<_> = merged.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);

        assert_eq!(merged[0].totals.net, dec!(50));
        assert_eq!(merged[1].totals.incomes, dec!(100));
        assert_eq!(merged[1].totals.net, dec!(125));
        assert_eq!(merged[2].totals.expenses, dec!(10));
        assert_eq!(merged[2].totals.net, dec!(-10));
    }

    #[test]
    fn empty_ledgers_give_empty_breakdown() {
        assert!(merge_monthly(&[], &[], &[]).is_empty());
    }
}
