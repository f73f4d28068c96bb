//! Storage layer for Tally
//!
//! JSON file storage with atomic writes. Each repository owns one file under
//! the data directory; [`Storage`] ties them together with the audit journal.

pub mod budgets;
pub mod corpus;
pub mod json_file;
pub mod transactions;

pub use budgets::BudgetRepository;
pub use corpus::CorpusRepository;
pub use json_file::JsonFile;
pub use transactions::TransactionRepository;

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType, Operation};
use crate::config::TallyPaths;
use crate::error::TallyResult;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: TallyPaths,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
    pub corpus: CorpusRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: TallyPaths) -> TallyResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            corpus: CorpusRepository::new(paths.corpus_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &TallyPaths {
        &self.paths
    }

    /// Load transactions and budgets from disk
    ///
    /// The corpus is loaded separately, since only classifier paths need it.
    pub fn load_all(&self) -> TallyResult<()> {
        self.transactions.load()?;
        self.budgets.load()?;
        Ok(())
    }

    /// Save transactions and budgets to disk
    pub fn save_all(&self) -> TallyResult<()> {
        self.transactions.save()?;
        self.budgets.save()?;
        Ok(())
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Record a created entity in the audit journal
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> TallyResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record a modified entity, with a field diff, in the audit journal
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> TallyResult<()> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    /// Record a removed entity in the audit journal
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> TallyResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Record a corpus or model event in the audit journal
    pub fn log_event(
        &self,
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        detail: impl Into<String>,
    ) -> TallyResult<()> {
        self.audit
            .log(&AuditEntry::event(operation, entity_type, entity_id, detail))
    }
}
