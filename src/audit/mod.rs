//! Audit journal
//!
//! Every mutation of transactions, budgets and the training corpus is
//! appended to `audit.log` as one JSON line, with before/after values where
//! an entity changed.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
