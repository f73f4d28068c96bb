//! Budget Variance Report
//!
//! Compares monthly budgets with actual spending per category and flags
//! categories that are close to or over their budget.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::error::{TallyError, TallyResult};
use crate::models::{Budget, Category, Money, Period, Transaction};

/// Spending above this share of the budget (in tenths) counts as near
const NEAR_THRESHOLD_TENTHS: i64 = 9;

/// Where actual spending sits relative to the budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceStatus {
    /// At most 90% of the budget spent
    Under,
    /// More than 90% and at most 100% spent
    Near,
    /// More than the budget spent, or any spend without a budget
    Over,
}

impl VarianceStatus {
    /// Classify actual spending against a budgeted amount
    pub fn classify(budgeted: Money, actual: Money) -> Self {
        if actual > budgeted {
            VarianceStatus::Over
        } else if i128::from(actual.cents()) * 10
            <= i128::from(budgeted.cents()) * i128::from(NEAR_THRESHOLD_TENTHS)
        {
            VarianceStatus::Under
        } else {
            VarianceStatus::Near
        }
    }
}

impl fmt::Display for VarianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarianceStatus::Under => write!(f, "under"),
            VarianceStatus::Near => write!(f, "near"),
            VarianceStatus::Over => write!(f, "over"),
        }
    }
}

/// Budgeted versus actual for one category in one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarianceRecord {
    pub category: Category,
    pub period: Period,
    pub budgeted: Money,
    pub actual: Money,
    /// `actual - budgeted`; positive means overspent
    pub variance: Money,
    pub status: VarianceStatus,
}

impl VarianceRecord {
    fn new(category: Category, period: Period, budgeted: Money, actual: Money) -> Self {
        Self {
            category,
            period,
            budgeted,
            actual,
            variance: actual - budgeted,
            status: VarianceStatus::classify(budgeted, actual),
        }
    }

    /// Share of the budget spent, if anything was budgeted
    pub fn percent_used(&self) -> Option<f64> {
        self.actual.percent_of(self.budgeted)
    }

    pub fn is_alert(&self) -> bool {
        self.status == VarianceStatus::Over
    }
}

/// Compute variance records for a period
///
/// Produces one record per budget in the period and one per unbudgeted
/// category with spending in the period. Transactions and budgets outside the
/// period are ignored. Records are ordered by category.
pub fn compute_variance(
    transactions: &[Transaction],
    budgets: &[Budget],
    period: Period,
) -> TallyResult<Vec<VarianceRecord>> {
    let mut budgeted: BTreeMap<Category, Money> = BTreeMap::new();
    for budget in budgets.iter().filter(|b| b.period == period) {
        if budgeted.insert(budget.category, budget.amount).is_some() {
            return Err(TallyError::Validation(format!(
                "Duplicate budget for {} in {}",
                budget.category, period
            )));
        }
    }

    let mut actual: BTreeMap<Category, Money> = BTreeMap::new();
    for txn in transactions.iter().filter(|t| period.contains(t.date)) {
        let total = actual.entry(txn.category).or_default();
        *total = total.checked_add(txn.amount).ok_or_else(|| {
            TallyError::Validation(format!(
                "Spending for {} in {} is too large to total",
                txn.category, period
            ))
        })?;
    }

    let categories: BTreeSet<Category> =
        budgeted.keys().chain(actual.keys()).copied().collect();
    let records: Vec<VarianceRecord> = categories
        .into_iter()
        .map(|category| {
            VarianceRecord::new(
                category,
                period,
                budgeted.get(&category).copied().unwrap_or_default(),
                actual.get(&category).copied().unwrap_or_default(),
            )
        })
        .collect();

    Ok(records)
}

/// Variance records for a period with totals and alerts
#[derive(Debug, Clone, Serialize)]
pub struct VarianceReport {
    pub period: Period,
    pub records: Vec<VarianceRecord>,
    pub total_budgeted: Money,
    pub total_actual: Money,
    pub total_variance: Money,
}

impl VarianceReport {
    /// Build a report from transactions and budgets
    pub fn generate(
        transactions: &[Transaction],
        budgets: &[Budget],
        period: Period,
    ) -> TallyResult<Self> {
        let records = compute_variance(transactions, budgets, period)?;
        let total_budgeted = checked_total(records.iter().map(|r| r.budgeted), period)?;
        let total_actual = checked_total(records.iter().map(|r| r.actual), period)?;

        Ok(Self {
            period,
            records,
            total_budgeted,
            total_actual,
            total_variance: total_actual - total_budgeted,
        })
    }

    /// Records whose status is over
    pub fn alerts(&self) -> Vec<&VarianceRecord> {
        self.records.iter().filter(|r| r.is_alert()).collect()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Budget Variance: {}\n", self.period));
        output.push_str(&"=".repeat(78));
        output.push('\n');

        if self.records.is_empty() {
            output.push_str("No budgets or spending for this period.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<22} {:>12} {:>12} {:>12} {:>8} {:>7}\n",
            "Category", "Budgeted", "Actual", "Variance", "Used", "Status"
        ));
        output.push_str(&"-".repeat(78));
        output.push('\n');

        for record in &self.records {
            let used = record
                .percent_used()
                .map(|p| format!("{:.1}%", p))
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "{:<22} {:>12} {:>12} {:>12} {:>8} {:>7}\n",
                record.category.name(),
                record.budgeted.format_with_symbol(currency_symbol),
                record.actual.format_with_symbol(currency_symbol),
                record.variance.format_with_symbol(currency_symbol),
                used,
                record.status.to_string()
            ));
        }

        output.push_str(&"-".repeat(78));
        output.push('\n');
        output.push_str(&format!(
            "{:<22} {:>12} {:>12} {:>12}\n",
            "TOTAL",
            self.total_budgeted.format_with_symbol(currency_symbol),
            self.total_actual.format_with_symbol(currency_symbol),
            self.total_variance.format_with_symbol(currency_symbol)
        ));

        let alerts = self.alerts();
        if !alerts.is_empty() {
            output.push_str("\nAlerts:\n");
            for record in alerts {
                if record.budgeted.is_zero() {
                    output.push_str(&format!(
                        "  {} has {} of spending with no budget\n",
                        record.category,
                        record.actual.format_with_symbol(currency_symbol)
                    ));
                } else {
                    output.push_str(&format!(
                        "  {} is over budget by {}\n",
                        record.category,
                        record.variance.format_with_symbol(currency_symbol)
                    ));
                }
            }
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> TallyResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer
            .write_record(["Period", "Category", "Budgeted", "Actual", "Variance", "Status"])
            .map_err(|e| TallyError::Export(e.to_string()))?;

        for record in &self.records {
            csv_writer
                .write_record([
                    record.period.to_string(),
                    record.category.name().to_string(),
                    format!("{:.2}", record.budgeted.as_f64()),
                    format!("{:.2}", record.actual.as_f64()),
                    format!("{:.2}", record.variance.as_f64()),
                    record.status.to_string(),
                ])
                .map_err(|e| TallyError::Export(e.to_string()))?;
        }

        csv_writer
            .flush()
            .map_err(|e| TallyError::Export(e.to_string()))?;
        Ok(())
    }
}

fn checked_total(mut amounts: impl Iterator<Item = Money>, period: Period) -> TallyResult<Money> {
    amounts.try_fold(Money::zero(), |acc, amount| {
        acc.checked_add(amount).ok_or_else(|| {
            TallyError::Validation(format!("Totals for {} are too large to report", period))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryAssignment, NewTransaction, PaymentMethod};
    use chrono::NaiveDate;

    fn june() -> Period {
        Period::new(2024, 6).unwrap()
    }

    fn spend(date: NaiveDate, cents: i64, category: Category) -> Transaction {
        let input = NewTransaction::new(
            date,
            Money::from_cents(cents),
            "test spend",
            Some(category),
            PaymentMethod::Cash,
        )
        .unwrap();
        Transaction::new(input, category, CategoryAssignment::Manual)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn budget(category: Category, cents: i64) -> Budget {
        Budget::new(category, Money::from_cents(cents), june()).unwrap()
    }

    #[test]
    fn test_food_over_budget() {
        let txns = vec![
            spend(day(3), 12000, Category::FoodDining),
            spend(day(17), 9550, Category::FoodDining),
        ];
        let budgets = vec![budget(Category::FoodDining, 20000)];

        let records = compute_variance(&txns, &budgets, june()).unwrap();
        assert_eq!(records.len(), 1);
        let food = &records[0];
        assert_eq!(food.category, Category::FoodDining);
        assert_eq!(food.actual, Money::from_cents(21550));
        assert_eq!(food.variance, Money::from_cents(1550));
        assert_eq!(food.status, VarianceStatus::Over);
    }

    #[test]
    fn test_food_over_budget_by_fifty() {
        let txns = vec![
            spend(day(5), 15000, Category::FoodDining),
            spend(day(20), 10000, Category::FoodDining),
        ];
        let budgets = vec![budget(Category::FoodDining, 20000)];

        let records = compute_variance(&txns, &budgets, june()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].budgeted, Money::from_units(200));
        assert_eq!(records[0].actual, Money::from_units(250));
        assert_eq!(records[0].variance, Money::from_units(50));
        assert_eq!(records[0].status, VarianceStatus::Over);
    }

    #[test]
    fn test_unbudgeted_travel_is_over() {
        let txns = vec![spend(day(12), 5000, Category::Travel)];

        let records = compute_variance(&txns, &[], june()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, Category::Travel);
        assert_eq!(records[0].budgeted, Money::zero());
        assert_eq!(records[0].actual, Money::from_units(50));
        assert_eq!(records[0].variance, Money::from_units(50));
        assert_eq!(records[0].status, VarianceStatus::Over);
    }

    #[test]
    fn test_unbudgeted_spend_is_over() {
        let txns = vec![spend(day(9), 4000, Category::Entertainment)];

        let records = compute_variance(&txns, &[], june()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, Category::Entertainment);
        assert_eq!(records[0].budgeted, Money::zero());
        assert_eq!(records[0].actual, Money::from_cents(4000));
        assert_eq!(records[0].variance, Money::from_cents(4000));
        assert_eq!(records[0].status, VarianceStatus::Over);
    }

    #[test]
    fn test_status_boundaries() {
        let budgeted = Money::from_cents(10000);
        assert_eq!(VarianceStatus::classify(budgeted, Money::zero()), VarianceStatus::Under);
        assert_eq!(
            VarianceStatus::classify(budgeted, Money::from_cents(9000)),
            VarianceStatus::Under
        );
        assert_eq!(
            VarianceStatus::classify(budgeted, Money::from_cents(9001)),
            VarianceStatus::Near
        );
        assert_eq!(
            VarianceStatus::classify(budgeted, Money::from_cents(10000)),
            VarianceStatus::Near
        );
        assert_eq!(
            VarianceStatus::classify(budgeted, Money::from_cents(10001)),
            VarianceStatus::Over
        );
        assert_eq!(
            VarianceStatus::classify(Money::zero(), Money::zero()),
            VarianceStatus::Under
        );
        assert_eq!(
            VarianceStatus::classify(Money::zero(), Money::from_cents(1)),
            VarianceStatus::Over
        );
    }

    #[test]
    fn test_status_of_very_large_amounts() {
        let budgeted = Money::parse("10000000000000000").unwrap();
        let actual = Money::parse("9500000000000000").unwrap();
        assert_eq!(VarianceStatus::classify(budgeted, actual), VarianceStatus::Near);

        let actual = Money::parse("9000000000000000").unwrap();
        assert_eq!(VarianceStatus::classify(budgeted, actual), VarianceStatus::Under);

        let max = Money::from_cents(i64::MAX);
        assert_eq!(VarianceStatus::classify(max, max), VarianceStatus::Near);
        assert_eq!(
            VarianceStatus::classify(max, Money::from_cents(i64::MAX / 10 * 9)),
            VarianceStatus::Under
        );
    }

    #[test]
    fn test_overflowing_spend_total_rejected() {
        // Stored transactions are not revalidated on load
        let mut first = spend(day(1), 100, Category::Shopping);
        let mut second = spend(day(2), 100, Category::Shopping);
        first.amount = Money::from_cents(i64::MAX);
        second.amount = Money::from_cents(i64::MAX);

        let err = compute_variance(&[first, second], &[], june()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_overflowing_report_total_rejected() {
        let mut food = spend(day(1), 100, Category::FoodDining);
        let mut travel = spend(day(2), 100, Category::Travel);
        food.amount = Money::from_cents(i64::MAX);
        travel.amount = Money::from_cents(i64::MAX);

        assert!(compute_variance(&[food.clone(), travel.clone()], &[], june()).is_ok());
        let err = VarianceReport::generate(&[food, travel], &[], june()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_every_budget_and_spending_category_covered() {
        let txns = vec![
            spend(day(1), 500, Category::Travel),
            spend(day(2), 700, Category::Shopping),
            spend(day(2), 300, Category::Shopping),
        ];
        let budgets = vec![
            budget(Category::Shopping, 5000),
            budget(Category::Healthcare, 2500),
        ];

        let records = compute_variance(&txns, &budgets, june()).unwrap();
        let categories: Vec<Category> = records.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![Category::Shopping, Category::Healthcare, Category::Travel]
        );

        for record in &records {
            assert_eq!(record.variance, record.actual - record.budgeted);
        }
        let healthcare = &records[1];
        assert_eq!(healthcare.actual, Money::zero());
        assert_eq!(healthcare.status, VarianceStatus::Under);
    }

    #[test]
    fn test_other_periods_ignored() {
        let may = Period::new(2024, 5).unwrap();
        let txns = vec![
            spend(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(), 9999, Category::FoodDining),
            spend(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(), 9999, Category::FoodDining),
            spend(day(30), 100, Category::FoodDining),
        ];
        let budgets = vec![
            Budget::new(Category::FoodDining, Money::from_cents(1), may).unwrap(),
            budget(Category::FoodDining, 1000),
        ];

        let records = compute_variance(&txns, &budgets, june()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].budgeted, Money::from_cents(1000));
        assert_eq!(records[0].actual, Money::from_cents(100));
    }

    #[test]
    fn test_duplicate_budget_rejected() {
        let budgets = vec![
            budget(Category::FoodDining, 1000),
            budget(Category::FoodDining, 2000),
        ];
        let err = compute_variance(&[], &budgets, june()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(compute_variance(&[], &[], june()).unwrap().is_empty());
    }

    #[test]
    fn test_report_totals_and_alerts() {
        let txns = vec![
            spend(day(3), 21550, Category::FoodDining),
            spend(day(9), 4000, Category::Entertainment),
            spend(day(10), 1000, Category::Transportation),
        ];
        let budgets = vec![
            budget(Category::FoodDining, 20000),
            budget(Category::Transportation, 5000),
        ];

        let report = VarianceReport::generate(&txns, &budgets, june()).unwrap();
        assert_eq!(report.total_budgeted, Money::from_cents(25000));
        assert_eq!(report.total_actual, Money::from_cents(26550));
        assert_eq!(report.total_variance, Money::from_cents(1550));

        let alerts: Vec<Category> = report.alerts().iter().map(|r| r.category).collect();
        assert_eq!(alerts, vec![Category::FoodDining, Category::Entertainment]);

        let text = report.format_terminal("$");
        assert!(text.contains("Budget Variance: 2024-06"));
        assert!(text.contains("Food & Dining is over budget by $15.50"));
        assert!(text.contains("Entertainment has $40.00 of spending with no budget"));
    }

    #[test]
    fn test_export_csv() {
        let txns = vec![spend(day(3), 21550, Category::FoodDining)];
        let budgets = vec![budget(Category::FoodDining, 20000)];
        let report = VarianceReport::generate(&txns, &budgets, june()).unwrap();

        let mut output = Vec::new();
        report.export_csv(&mut output).unwrap();
        let csv = String::from_utf8(output).unwrap();

        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Period,Category,Budgeted,Actual,Variance,Status")
        );
        assert_eq!(lines.next(), Some("2024-06,Food & Dining,200.00,215.50,15.50,over"));
    }
}
