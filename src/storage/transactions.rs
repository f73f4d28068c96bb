//! Transaction repository for JSON storage
//!
//! Manages loading and saving expenses to transactions.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;

use crate::error::{TallyError, TallyResult};
use crate::models::{Category, Period, Transaction, TransactionId};

use super::json_file::JsonFile;

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence
pub struct TransactionRepository {
    file: JsonFile<TransactionData>,
    data: RwLock<HashMap<TransactionId, Transaction>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: JsonFile::new(path),
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk
    pub fn load(&self) -> TallyResult<()> {
        let file_data = self.file.load_or_default()?;

        let mut data = self.write()?;
        data.clear();
        for txn in file_data.transactions {
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk, newest first
    pub fn save(&self) -> TallyResult<()> {
        let transactions = self.get_all()?;
        self.file.save(&TransactionData { transactions })
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> TallyResult<Option<Transaction>> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// Resolve a user-typed ID fragment to a single transaction
    ///
    /// Fails with `Validation` when the fragment matches more than one.
    pub fn find(&self, fragment: &str) -> TallyResult<Option<Transaction>> {
        let data = self.read()?;
        let mut matches = data.values().filter(|t| t.id.matches(fragment));

        let first = matches.next().cloned();
        if matches.next().is_some() {
            return Err(TallyError::Validation(format!(
                "Transaction ID '{}' is ambiguous; type more characters",
                fragment
            )));
        }
        Ok(first)
    }

    /// Get all transactions, newest first
    pub fn get_all(&self) -> TallyResult<Vec<Transaction>> {
        let data = self.read()?;
        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(transactions)
    }

    /// Get transactions in a date range (inclusive)
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> TallyResult<Vec<Transaction>> {
        let all = self.get_all()?;
        Ok(all
            .into_iter()
            .filter(|t| t.date >= start && t.date <= end)
            .collect())
    }

    /// Get transactions dated within a budget period
    pub fn get_for_period(&self, period: Period) -> TallyResult<Vec<Transaction>> {
        self.get_by_date_range(period.start_date(), period.end_date())
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> TallyResult<()> {
        self.write()?.insert(txn.id, txn);
        Ok(())
    }

    /// Assign a user-chosen category, returning the transaction before and after
    pub fn set_category(
        &self,
        id: TransactionId,
        category: Category,
    ) -> TallyResult<(Transaction, Transaction)> {
        let mut data = self.write()?;
        let txn = data
            .get_mut(&id)
            .ok_or_else(|| TallyError::transaction_not_found(id.to_string()))?;

        let before = txn.clone();
        txn.set_category(category);
        Ok((before, txn.clone()))
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> TallyResult<Option<Transaction>> {
        Ok(self.write()?.remove(&id))
    }

    /// Count transactions
    pub fn count(&self) -> TallyResult<usize> {
        Ok(self.read()?.len())
    }

    fn read(&self) -> TallyResult<RwLockReadGuard<'_, HashMap<TransactionId, Transaction>>> {
        self.data
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> TallyResult<RwLockWriteGuard<'_, HashMap<TransactionId, Transaction>>> {
        self.data
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}
