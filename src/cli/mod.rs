//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod classify;
pub mod report;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use classify::{
    handle_categorize, handle_corpus_command, handle_correct, handle_refit, CorpusCommands,
    CorpusFormat,
};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_receipt, handle_transaction_command, TransactionCommands};

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{TallyError, TallyResult};
use crate::models::{Money, Period};

/// Parse a `YYYY-MM-DD` date argument
pub(crate) fn parse_date(s: &str) -> TallyResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        TallyError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", s))
    })
}

/// Parse an optional date argument
pub(crate) fn parse_optional_date(s: Option<&str>) -> TallyResult<Option<NaiveDate>> {
    s.map(parse_date).transpose()
}

/// Parse an amount argument (e.g. "12.50")
pub(crate) fn parse_amount(s: &str) -> TallyResult<Money> {
    Money::parse(s)
        .map_err(|e| TallyError::Validation(format!("Invalid amount '{}': {}", s, e)))
}

/// Parse a period argument, defaulting to the current month
pub(crate) fn parse_period(s: Option<&str>) -> TallyResult<Period> {
    Period::parse_or_current(s).map_err(|e| TallyError::Validation(e.to_string()))
}

/// Open the output file, or stdout when none is given
pub(crate) fn open_output(output: Option<&Path>) -> TallyResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                TallyError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Flush an output opened with [`open_output`]
pub(crate) fn finish_output(mut writer: Box<dyn Write>) -> TallyResult<()> {
    writer
        .flush()
        .map_err(|e| TallyError::Export(format!("Failed to write output: {}", e)))
}
