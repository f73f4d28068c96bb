//! Budget display formatting

use crate::models::{Budget, Money, Period};

/// Format the budgets set for a period
pub fn format_budget_list(period: Period, budgets: &[Budget], currency_symbol: &str) -> String {
    if budgets.is_empty() {
        return format!("No budgets set for {}.\n", period);
    }

    let mut output = String::new();
    output.push_str(&format!("Budgets for {}\n\n", period));
    output.push_str(&format!("{:20} {:>12}\n", "Category", "Amount"));
    output.push_str(&"-".repeat(33));
    output.push('\n');

    for budget in budgets {
        output.push_str(&format!(
            "{:20} {:>12}\n",
            budget.category.name(),
            budget.amount.format_with_symbol(currency_symbol)
        ));
    }

    let total: Money = budgets.iter().map(|b| b.amount).sum();
    output.push_str(&"-".repeat(33));
    output.push('\n');
    output.push_str(&format!(
        "{:20} {:>12}\n",
        "Total",
        total.format_with_symbol(currency_symbol)
    ));

    output
}
