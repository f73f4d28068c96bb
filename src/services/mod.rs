//! Service layer for Tally
//!
//! Business logic on top of the storage layer: validation, categorization,
//! persistence and auditing of each change.

pub mod budget;
pub mod corpus;
pub mod import;
pub mod transaction;

pub use budget::BudgetService;
pub use corpus::{CorpusService, CorpusStats, ImportOutcome};
pub use import::{ColumnMapping, ImportResult, ImportService, ParsedRow};
pub use transaction::{RecordedTransaction, TransactionFilter, TransactionService};
