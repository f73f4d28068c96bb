//! Transaction service
//!
//! Records expenses, resolves their category (explicitly, or through the
//! classifier), and keeps the audit journal in step with every change.

use chrono::NaiveDate;
use tracing::info;

use crate::audit::EntityType;
use crate::classifier::{CategorizationResult, CategorizationService};
use crate::error::{TallyError, TallyResult};
use crate::models::{
    Category, CategoryAssignment, NewTransaction, PaymentMethod, ReceiptDraft, Transaction,
};
use crate::services::CorpusService;
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
    categorizer: &'a CategorizationService,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<Category>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only transactions on or after `start`
    pub fn starting(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Only transactions on or before `end`
    pub fn ending(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A recorded transaction and, when the classifier chose its category, the
/// classifier's answer
#[derive(Debug, Clone)]
pub struct RecordedTransaction {
    pub transaction: Transaction,
    pub categorization: Option<CategorizationResult>,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage, categorizer: &'a CategorizationService) -> Self {
        Self {
            storage,
            categorizer,
        }
    }

    /// Resolve the category for new input
    ///
    /// An explicit category always wins. Otherwise the classifier decides when
    /// `auto_categorize` is on, and the fallback category is used when it is off.
    pub fn resolve_category(
        &self,
        input: &NewTransaction,
        auto_categorize: bool,
    ) -> (Category, CategoryAssignment, Option<CategorizationResult>) {
        match input.category {
            Some(category) => (category, CategoryAssignment::Manual, None),
            None if auto_categorize => {
                let result = self.categorizer.categorize(&input.description);
                (result.category, result.assignment(), Some(result))
            }
            None => (
                Category::FALLBACK,
                CategoryAssignment::Fallback { confidence: 0.0 },
                None,
            ),
        }
    }

    /// Record a new expense
    pub fn create(
        &self,
        input: NewTransaction,
        auto_categorize: bool,
    ) -> TallyResult<RecordedTransaction> {
        input.validate()?;
        let recorded = self.build(input, auto_categorize);

        self.storage.transactions.upsert(recorded.transaction.clone())?;
        self.storage.transactions.save()?;
        self.log_created(&recorded.transaction)?;

        Ok(recorded)
    }

    /// Validate an extracted receipt and record it, always auto-categorized
    pub fn create_from_receipt(
        &self,
        draft: &ReceiptDraft,
        today: NaiveDate,
        payment_method: PaymentMethod,
    ) -> TallyResult<RecordedTransaction> {
        let input = draft.validate(today, payment_method)?;
        self.create(input, true)
    }

    /// Build a transaction without persisting it
    pub(crate) fn build(&self, input: NewTransaction, auto_categorize: bool) -> RecordedTransaction {
        let (category, assignment, categorization) = self.resolve_category(&input, auto_categorize);
        RecordedTransaction {
            transaction: Transaction::new(input, category, assignment),
            categorization,
        }
    }

    pub(crate) fn log_created(&self, txn: &Transaction) -> TallyResult<()> {
        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            txn,
        )
    }

    /// Find a transaction by full ID or short ID fragment
    pub fn find(&self, identifier: &str) -> TallyResult<Transaction> {
        self.storage
            .transactions
            .find(identifier)?
            .ok_or_else(|| TallyError::transaction_not_found(identifier))
    }

    /// List transactions, newest first
    pub fn list(&self, filter: &TransactionFilter) -> TallyResult<Vec<Transaction>> {
        let mut transactions = match (filter.start_date, filter.end_date) {
            (Some(start), Some(end)) => self.storage.transactions.get_by_date_range(start, end)?,
            _ => self.storage.transactions.get_all()?,
        };

        if let Some(start) = filter.start_date {
            transactions.retain(|t| t.date >= start);
        }
        if let Some(end) = filter.end_date {
            transactions.retain(|t| t.date <= end);
        }
        if let Some(category) = filter.category {
            transactions.retain(|t| t.category == category);
        }
        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Assign a category chosen by the user
    ///
    /// With `learn`, the description and category are also recorded as a
    /// training correction. The model picks it up at the next refit.
    pub fn recategorize(
        &self,
        identifier: &str,
        category: Category,
        learn: bool,
    ) -> TallyResult<Transaction> {
        let txn = self.find(identifier)?;
        let (before, after) = self.storage.transactions.set_category(txn.id, category)?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            after.id.to_string(),
            Some(after.description.clone()),
            &before,
            &after,
        )?;

        if learn {
            CorpusService::new(self.storage, self.categorizer)
                .record_correction(&after.description, category)?;
        }

        info!(id = %after.id, category = %category, learn, "recategorized transaction");
        Ok(after)
    }

    /// Delete a transaction
    pub fn delete(&self, identifier: &str) -> TallyResult<Transaction> {
        let txn = self.find(identifier)?;
        self.storage
            .transactions
            .delete(txn.id)?
            .ok_or_else(|| TallyError::transaction_not_found(identifier))?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &txn,
        )?;

        Ok(txn)
    }
}
