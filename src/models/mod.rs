//! Core data models for Tally
//!
//! This module contains the data structures of the expense domain:
//! categories, transactions, budgets, training examples and receipt drafts.

pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod period;
pub mod receipt;
pub mod training;
pub mod transaction;

pub use budget::Budget;
pub use category::Category;
pub use ids::TransactionId;
pub use money::Money;
pub use period::Period;
pub use receipt::ReceiptDraft;
pub use training::{ExampleSource, LabeledText, TrainingExample};
pub use transaction::{CategoryAssignment, NewTransaction, PaymentMethod, Transaction};
