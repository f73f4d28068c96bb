//! Transaction CLI commands
//!
//! Implements CLI commands for recording, listing, recategorizing, importing
//! and exporting expenses, plus receipt-draft intake.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use clap::Subcommand;

use crate::classifier::CategorizationService;
use crate::config::settings::Settings;
use crate::display::{format_transaction_details, format_transaction_register};
use crate::error::{TallyError, TallyResult};
use crate::export::export_transactions_csv;
use crate::models::{Category, NewTransaction, PaymentMethod, ReceiptDraft};
use crate::services::{ImportService, RecordedTransaction, TransactionFilter, TransactionService};
use crate::storage::Storage;

use super::{finish_output, open_output, parse_amount, parse_date, parse_optional_date};

/// Transaction subcommands
#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Record a new expense
    Add {
        /// Amount spent (e.g., "12.50")
        amount: String,
        /// What the money was spent on
        description: String,
        /// Transaction date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Category (categorized automatically when omitted)
        #[arg(short, long)]
        category: Option<String>,
        /// Payment method (e.g., "cash", "credit card")
        #[arg(short = 'm', long = "method")]
        method: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show transaction details
    Show {
        /// Transaction ID (or prefix)
        id: String,
    },

    /// Assign a category to a transaction
    Categorize {
        /// Transaction ID (or prefix)
        id: String,
        /// New category
        category: String,
        /// Also record the description as a training correction
        #[arg(long)]
        learn: bool,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID (or prefix)
        id: String,
    },

    /// Import transactions from CSV (date,amount,description[,category][,payment_method])
    Import {
        /// Path to CSV file
        file: PathBuf,
    },

    /// Export transactions to CSV
    Export {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    categorizer: &CategorizationService,
    cmd: TransactionCommands,
) -> TallyResult<()> {
    let service = TransactionService::new(storage, categorizer);

    match cmd {
        TransactionCommands::Add {
            amount,
            description,
            date,
            category,
            method,
        } => {
            let amount = parse_amount(&amount)?;
            let date = match date {
                Some(date) => parse_date(&date)?,
                None => chrono::Local::now().date_naive(),
            };
            let category = category.map(|c| c.parse::<Category>()).transpose()?;
            let payment_method = match method {
                Some(method) => method.parse::<PaymentMethod>()?,
                None => settings.default_payment_method,
            };

            let input = NewTransaction::new(date, amount, description, category, payment_method)?;
            let recorded = service.create(input, settings.auto_categorize)?;
            print_recorded(&recorded, settings);
        }

        TransactionCommands::List {
            from,
            to,
            category,
            limit,
        } => {
            let filter = build_filter(from.as_deref(), to.as_deref())?.limit(limit);
            let filter = match category {
                Some(category) => filter.category(category.parse()?),
                None => filter,
            };

            let transactions = service.list(&filter)?;
            print!(
                "{}",
                format_transaction_register(&transactions, &settings.currency_symbol)
            );
            println!("\nShowing {} transactions", transactions.len());
        }

        TransactionCommands::Show { id } => {
            let txn = service.find(&id)?;
            print!(
                "{}",
                format_transaction_details(&txn, &settings.currency_symbol)
            );
        }

        TransactionCommands::Categorize {
            id,
            category,
            learn,
        } => {
            let category: Category = category.parse()?;
            let txn = service.recategorize(&id, category, learn)?;

            println!("Categorized {} as {}", txn.id, txn.category);
            if learn {
                println!("Recorded as a correction. Run 'tally refit' to apply it to the model.");
            }
        }

        TransactionCommands::Delete { id } => {
            let txn = service.delete(&id)?;
            println!("Deleted transaction {}: {}", txn.id, txn.description);
        }

        TransactionCommands::Import { file } => {
            let reader = File::open(&file).map_err(|e| {
                TallyError::Import(format!("Failed to open {}: {}", file.display(), e))
            })?;

            let importer = ImportService::new(storage, service);
            let rows = importer.parse_csv(BufReader::new(reader), settings.default_payment_method)?;
            let result = importer.import(rows, settings.auto_categorize)?;

            println!("Import complete:");
            println!("  Imported:           {}", result.imported);
            println!("  Auto-categorized:   {}", result.auto_categorized);
            println!("  Duplicates skipped: {}", result.duplicates_skipped);
            if !result.errors.is_empty() {
                println!("  Errors:             {}", result.errors.len());
                for (line, message) in &result.errors {
                    println!("    line {}: {}", line, message);
                }
            }
        }

        TransactionCommands::Export { from, to, output } => {
            let filter = build_filter(from.as_deref(), to.as_deref())?;
            let transactions = service.list(&filter)?;

            let mut writer = open_output(output.as_deref())?;
            export_transactions_csv(&transactions, &mut writer)?;
            finish_output(writer)?;

            if let Some(path) = output {
                println!(
                    "Exported {} transactions to: {}",
                    transactions.len(),
                    path.display()
                );
            }
        }
    }

    Ok(())
}

/// Validate an extracted receipt, categorize it and record it
pub fn handle_receipt(
    storage: &Storage,
    settings: &Settings,
    categorizer: &CategorizationService,
    file: PathBuf,
) -> TallyResult<()> {
    let contents = fs::read_to_string(&file).map_err(|e| {
        TallyError::Import(format!("Failed to read {}: {}", file.display(), e))
    })?;
    let draft: ReceiptDraft = serde_json::from_str(&contents)
        .map_err(|e| TallyError::Import(format!("Invalid receipt draft: {}", e)))?;

    let today = chrono::Local::now().date_naive();
    let recorded = TransactionService::new(storage, categorizer).create_from_receipt(
        &draft,
        today,
        settings.default_payment_method,
    )?;

    print_recorded(&recorded, settings);
    Ok(())
}

fn build_filter(from: Option<&str>, to: Option<&str>) -> TallyResult<TransactionFilter> {
    let from = parse_optional_date(from)?;
    let to = parse_optional_date(to)?;

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(TallyError::Validation(format!(
                "Start date {} is after end date {}",
                from, to
            )));
        }
    }

    let mut filter = TransactionFilter::new();
    if let Some(from) = from {
        filter = filter.starting(from);
    }
    if let Some(to) = to {
        filter = filter.ending(to);
    }
    Ok(filter)
}

fn print_recorded(recorded: &RecordedTransaction, settings: &Settings) {
    let txn = &recorded.transaction;

    println!("Created transaction:");
    print!(
        "{}",
        format_transaction_details(txn, &settings.currency_symbol)
    );
    if let Some(result) = &recorded.categorization {
        if result.is_fallback {
            println!(
                "Low confidence ({:.1}%); filed under {}. Use 'tally txn categorize' to fix it.",
                result.confidence * 100.0,
                result.category
            );
        }
    }
}
