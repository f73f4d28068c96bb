use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use tally::classifier::{CategorizationService, TrainingCorpus};
use tally::cli::{
    handle_budget_command, handle_categorize, handle_corpus_command, handle_correct,
    handle_receipt, handle_refit, handle_report_command, handle_transaction_command,
};
use tally::config::{paths::TallyPaths, settings::Settings};
use tally::logging;
use tally::storage::Storage;

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Expense categorization and budget variance tracking",
    long_about = "Tally records expenses, assigns each one a spending category with a \
                  Naive Bayes classifier trained on labeled examples and your own \
                  corrections, and compares monthly spending against category budgets."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Categorize a description
    Categorize {
        /// Free-text description (e.g., "uber ride downtown")
        text: String,
        /// Show the probability of every category
        #[arg(long)]
        explain: bool,
    },

    /// Record the right category for a description
    Correct {
        /// Free-text description
        text: String,
        /// Correct category
        category: String,
    },

    /// Refit the classifier from the training corpus
    Refit,

    /// Training corpus commands
    #[command(subcommand)]
    Corpus(tally::cli::CorpusCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(tally::cli::TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(tally::cli::BudgetCommands),

    /// Variance and spending reports
    #[command(subcommand)]
    Report(tally::cli::ReportCommands),

    /// Record an expense from an extracted receipt draft (JSON)
    Receipt {
        /// Path to a `{amount, date, description}` JSON file
        file: PathBuf,
    },

    /// Initialize the data directory and seed the training corpus
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = TallyPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    logging::init_tracing(settings.log_format);

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let corpus = Arc::new(storage.corpus.load()?);
    let categorizer = load_categorizer(Arc::clone(&corpus))?;

    match cli.command {
        Some(Commands::Categorize { text, explain }) => {
            handle_categorize(&categorizer, &text, explain)?;
        }
        Some(Commands::Correct { text, category }) => {
            handle_correct(&storage, &categorizer, &text, &category)?;
        }
        Some(Commands::Refit) => {
            handle_refit(&storage, &categorizer)?;
        }
        Some(Commands::Corpus(cmd)) => {
            handle_corpus_command(&storage, &categorizer, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, &categorizer, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Receipt { file }) => {
            handle_receipt(&storage, &settings, &categorizer, file)?;
        }
        Some(Commands::Init) => {
            println!("Initializing Tally at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            if !storage.corpus.exists() {
                storage.corpus.save(&corpus.snapshot()?)?;
            }
            storage.save_all()?;
            println!("Initialization complete!");
            println!();
            println!(
                "The training corpus holds {} examples across {} categories.",
                corpus.len(),
                tally::models::Category::ALL.len()
            );
            println!();
            println!("Run 'tally txn add <amount> <description>' to record an expense.");
        }
        Some(Commands::Config) => {
            println!("Tally Configuration");
            println!("===================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:        {}", settings.currency_symbol);
            println!("  Date format:            {}", settings.date_format);
            println!("  Default payment method: {}", settings.default_payment_method);
            println!("  Auto-categorize:        {}", settings.auto_categorize);
            println!("  Log format:             {:?}", settings.log_format);
        }
        None => {
            println!("Tally - expense categorization and budget variance tracking");
            println!();
            println!("Run 'tally --help' for usage information.");
            println!("Run 'tally init' to set up the data directory.");
        }
    }

    Ok(())
}

/// Fit the startup model, or run without one when the corpus is empty
fn load_categorizer(corpus: Arc<TrainingCorpus>) -> Result<CategorizationService> {
    if corpus.is_empty() {
        debug!("training corpus is empty; categorization will use the fallback");
        return Ok(CategorizationService::new(corpus));
    }
    Ok(CategorizationService::fitted(corpus)?)
}
