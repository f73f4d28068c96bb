//! CLI commands for reports
//!
//! Budget variance for a month and spending by category for a date range.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{TallyError, TallyResult};
use crate::models::Period;
use crate::reports::SpendingReport;
use crate::services::BudgetService;
use crate::storage::Storage;

use super::{finish_output, open_output, parse_optional_date, parse_period};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Compare budgeted and actual spending per category
    Variance {
        /// Budget period (e.g., "2025-01", "current", "last")
        #[arg(short, long)]
        period: Option<String>,

        /// Write CSV instead of the terminal report
        #[arg(long)]
        csv: bool,

        /// CSV output file (defaults to stdout)
        #[arg(short, long, requires = "csv")]
        output: Option<PathBuf>,
    },

    /// Spending by category with a daily trend
    Spending {
        /// Start date (YYYY-MM-DD, defaults to the start of this month)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, defaults to the end of this month)
        #[arg(long)]
        to: Option<String>,

        /// Show top N categories only
        #[arg(long)]
        top: Option<usize>,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> TallyResult<()> {
    match cmd {
        ReportCommands::Variance {
            period,
            csv,
            output,
        } => {
            let period = parse_period(period.as_deref())?;
            let report = BudgetService::new(storage).variance(period)?;

            if csv {
                let mut writer = open_output(output.as_deref())?;
                report.export_csv(&mut writer)?;
                finish_output(writer)?;

                if let Some(path) = output {
                    println!(
                        "Exported {} variance records to: {}",
                        report.records.len(),
                        path.display()
                    );
                }
            } else {
                print!("{}", report.format_terminal(&settings.currency_symbol));
            }
        }

        ReportCommands::Spending { from, to, top } => {
            let (start, end) = spending_range(from.as_deref(), to.as_deref())?;
            let mut report = SpendingReport::generate(storage, start, end)?;

            if let Some(limit) = top {
                report.categories.truncate(limit);
            }
            print!("{}", report.format_terminal(&settings.currency_symbol));
        }
    }

    Ok(())
}

/// Resolve the spending report range, defaulting to the current month
fn spending_range(from: Option<&str>, to: Option<&str>) -> TallyResult<(NaiveDate, NaiveDate)> {
    let current = Period::current();
    let start = parse_optional_date(from)?.unwrap_or_else(|| current.start_date());
    let end = parse_optional_date(to)?.unwrap_or_else(|| current.end_date());

    if start > end {
        return Err(TallyError::Validation(format!(
            "Start date {} is after end date {}",
            start, end
        )));
    }
    Ok((start, end))
}
