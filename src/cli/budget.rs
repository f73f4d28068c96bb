//! Budget CLI commands
//!
//! Implements CLI commands for setting, listing and removing monthly
//! category budgets.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_budget_list;
use crate::error::TallyResult;
use crate::models::Category;
use crate::services::BudgetService;
use crate::storage::Storage;

use super::{parse_amount, parse_period};

/// Budget subcommands
#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Set the budget for a category, replacing any existing one
    Set {
        /// Category name
        category: String,
        /// Amount (e.g., "500" or "500.00")
        amount: String,
        /// Budget period (e.g., "2025-01", "current", "last")
        #[arg(short, long)]
        period: Option<String>,
    },

    /// List budgets for a period
    List {
        /// Budget period (e.g., "2025-01", "current", "last")
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Remove the budget for a category
    Remove {
        /// Category name
        category: String,
        /// Budget period (e.g., "2025-01", "current", "last")
        #[arg(short, long)]
        period: Option<String>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> TallyResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Set {
            category,
            amount,
            period,
        } => {
            let category: Category = category.parse()?;
            let amount = parse_amount(&amount)?;
            let period = parse_period(period.as_deref())?;

            let budget = service.set(category, amount, period)?;
            println!(
                "Budget for {} in {} set to {}",
                budget.category,
                budget.period,
                budget.amount.format_with_symbol(&settings.currency_symbol)
            );
        }

        BudgetCommands::List { period } => {
            let period = parse_period(period.as_deref())?;
            let budgets = service.list(period)?;
            print!(
                "{}",
                format_budget_list(period, &budgets, &settings.currency_symbol)
            );
        }

        BudgetCommands::Remove { category, period } => {
            let category: Category = category.parse()?;
            let period = parse_period(period.as_deref())?;

            let removed = service.remove(category, period)?;
            println!("Removed budget for {} in {}", removed.category, removed.period);
        }
    }

    Ok(())
}
