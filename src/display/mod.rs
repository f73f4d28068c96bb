//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display:
//! transaction registers, budget lists, and classifier output.

pub mod budget;
pub mod corpus;
pub mod transaction;

pub use budget::format_budget_list;
pub use corpus::{format_categorization, format_corpus_list, format_corpus_stats};
pub use transaction::{
    format_assignment, format_transaction_details, format_transaction_register,
    format_transaction_row,
};
