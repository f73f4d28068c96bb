//! Spending Report
//!
//! Category totals and a day-by-day spending trend for a date range.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::TallyResult;
use crate::models::{Category, Money, Transaction};
use crate::storage::Storage;

/// Width of the bar drawn for the largest day in the trend
const TREND_BAR_WIDTH: usize = 30;

/// Spending breakdown by category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingByCategory {
    pub category: Category,
    pub total: Money,
    pub transaction_count: usize,
    /// Share of total spending, 0 to 100
    pub percentage: f64,
}

/// Spending on a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailySpending {
    pub date: NaiveDate,
    pub total: Money,
}

/// Spending Report
#[derive(Debug, Clone, Serialize)]
pub struct SpendingReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Largest total first
    pub categories: Vec<SpendingByCategory>,
    /// Days with spending, in date order
    pub daily: Vec<DailySpending>,
    pub total_spending: Money,
    pub total_transactions: usize,
}

impl SpendingReport {
    /// Generate a spending report for a date range
    pub fn generate(storage: &Storage, start_date: NaiveDate, end_date: NaiveDate) -> TallyResult<Self> {
        let transactions = storage.transactions.get_by_date_range(start_date, end_date)?;
        Ok(Self::from_transactions(&transactions, start_date, end_date))
    }

    /// Build the report from transactions; those outside the range are ignored
    pub fn from_transactions(
        transactions: &[Transaction],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let mut by_category: BTreeMap<Category, (Money, usize)> = BTreeMap::new();
        let mut by_day: BTreeMap<NaiveDate, Money> = BTreeMap::new();
        let mut total_spending = Money::zero();
        let mut total_transactions = 0;

        for txn in transactions
            .iter()
            .filter(|t| t.date >= start_date && t.date <= end_date)
        {
            let entry = by_category.entry(txn.category).or_default();
            entry.0 += txn.amount;
            entry.1 += 1;
            *by_day.entry(txn.date).or_default() += txn.amount;
            total_spending += txn.amount;
            total_transactions += 1;
        }

        let mut categories: Vec<SpendingByCategory> = by_category
            .into_iter()
            .map(|(category, (total, transaction_count))| SpendingByCategory {
                category,
                total,
                transaction_count,
                percentage: total.percent_of(total_spending).unwrap_or(0.0),
            })
            .collect();
        // Stable sort keeps category order among equal totals
        categories.sort_by(|a, b| b.total.cmp(&a.total));

        let daily = by_day
            .into_iter()
            .map(|(date, total)| DailySpending { date, total })
            .collect();

        Self {
            start_date,
            end_date,
            categories,
            daily,
            total_spending,
            total_transactions,
        }
    }

    /// Get top spending categories
    pub fn top_categories(&self, limit: usize) -> &[SpendingByCategory] {
        &self.categories[..limit.min(self.categories.len())]
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Spending Report: {} to {}\n",
            self.start_date, self.end_date
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "Total Spending: {}\n",
            self.total_spending.format_with_symbol(currency_symbol)
        ));
        output.push_str(&format!("Total Transactions: {}\n\n", self.total_transactions));

        if self.categories.is_empty() {
            output.push_str("No spending in this range.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<25} {:>12} {:>8} {:>8}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for row in &self.categories {
            output.push_str(&format!(
                "{:<25} {:>12} {:>8} {:>7.1}%\n",
                row.category.name(),
                row.total.format_with_symbol(currency_symbol),
                row.transaction_count,
                row.percentage
            ));
        }

        output.push_str("\nDaily Trend\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        let peak = self
            .daily
            .iter()
            .map(|d| d.total.cents())
            .max()
            .unwrap_or(0);
        for day in &self.daily {
            let width = if peak > 0 {
                (day.total.cents() * TREND_BAR_WIDTH as i64 / peak).max(1) as usize
            } else {
                0
            };
            output.push_str(&format!(
                "{} {:>12} {}\n",
                day.date,
                day.total.format_with_symbol(currency_symbol),
                "#".repeat(width)
            ));
        }

        output
    }
}
