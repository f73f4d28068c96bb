//! Export module for Tally
//!
//! - CSV: transactions, in the layout the importer reads
//! - JSON and YAML: the training corpus, as portable `{text, label}` records

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_transactions_csv, TRANSACTION_HEADERS};
pub use json::{export_corpus_json, import_corpus_json};
pub use yaml::{export_corpus_yaml, import_corpus_yaml};
