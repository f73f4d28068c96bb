//! Budget repository for JSON storage
//!
//! Manages loading and saving monthly budgets to budgets.json. Budgets are
//! keyed by (category, period), so at most one exists per key.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{TallyError, TallyResult};
use crate::models::{Budget, Category, Period};

use super::json_file::JsonFile;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<Budget>,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    file: JsonFile<BudgetData>,
    budgets: RwLock<BTreeMap<(Period, Category), Budget>>,
}

impl BudgetRepository {
    /// Create a new budget repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: JsonFile::new(path),
            budgets: RwLock::new(BTreeMap::new()),
        }
    }

    /// Load budgets from disk
    ///
    /// A file holding two budgets for the same category and month is rejected
    /// rather than silently keeping one of them.
    pub fn load(&self) -> TallyResult<()> {
        let file_data = self.file.load_or_default()?;

        let mut loaded = BTreeMap::new();
        for budget in file_data.budgets {
            budget.validate()?;
            let key = (budget.period, budget.category);
            if loaded.insert(key, budget).is_some() {
                return Err(TallyError::Validation(format!(
                    "Duplicate budget for {} in {} in {}",
                    key.1,
                    key.0,
                    self.file.path().display()
                )));
            }
        }

        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *budgets = loaded;
        Ok(())
    }

    /// Save budgets to disk, ordered by period then category
    pub fn save(&self) -> TallyResult<()> {
        let file_data = BudgetData {
            budgets: self.get_all()?,
        };
        self.file.save(&file_data)
    }

    /// Get the budget for a category and period
    pub fn get(&self, category: Category, period: Period) -> TallyResult<Option<Budget>> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(budgets.get(&(period, category)).cloned())
    }

    /// Get all budgets for a period, in category order
    pub fn get_for_period(&self, period: Period) -> TallyResult<Vec<Budget>> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(budgets
            .range((period, Category::ALL[0])..=(period, Category::FALLBACK))
            .map(|(_, b)| b.clone())
            .collect())
    }

    /// Get all budgets
    pub fn get_all(&self) -> TallyResult<Vec<Budget>> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(budgets.values().cloned().collect())
    }

    /// Insert or replace the budget for its (category, period)
    ///
    /// Returns the budget it replaced, if any.
    pub fn upsert(&self, budget: Budget) -> TallyResult<Option<Budget>> {
        budget.validate()?;
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        Ok(budgets.insert((budget.period, budget.category), budget))
    }

    /// Remove the budget for a category and period
    pub fn remove(&self, category: Category, period: Period) -> TallyResult<Option<Budget>> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        Ok(budgets.remove(&(period, category)))
    }

    /// Count budgets
    pub fn count(&self) -> TallyResult<usize> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(budgets.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, BudgetRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");
        let repo = BudgetRepository::new(path);
        (temp_dir, repo)
    }

    fn budget(category: Category, cents: i64, period: Period) -> Budget {
        Budget::new(category, Money::from_cents(cents), period).unwrap()
    }

    #[test]
    fn test_upsert_replaces_same_key() {
        let (_temp_dir, repo) = create_test_repo();
        let june = Period::new(2024, 6).unwrap();

        assert!(repo.upsert(budget(Category::FoodDining, 20000, june)).unwrap().is_none());
        let replaced = repo.upsert(budget(Category::FoodDining, 25000, june)).unwrap();
        assert_eq!(replaced.unwrap().amount.cents(), 20000);

        assert_eq!(repo.count().unwrap(), 1);
        let current = repo.get(Category::FoodDining, june).unwrap().unwrap();
        assert_eq!(current.amount.cents(), 25000);
    }

    #[test]
    fn test_get_for_period_in_category_order() {
        let (_temp_dir, repo) = create_test_repo();
        let june = Period::new(2024, 6).unwrap();
        let july = Period::new(2024, 7).unwrap();

        repo.upsert(budget(Category::Miscellaneous, 100, june)).unwrap();
        repo.upsert(budget(Category::Travel, 100, june)).unwrap();
        repo.upsert(budget(Category::FoodDining, 100, june)).unwrap();
        repo.upsert(budget(Category::FoodDining, 100, july)).unwrap();

        let categories: Vec<Category> = repo
            .get_for_period(june)
            .unwrap()
            .iter()
            .map(|b| b.category)
            .collect();
        assert_eq!(
            categories,
            vec![Category::FoodDining, Category::Travel, Category::Miscellaneous]
        );
    }

    #[test]
    fn test_save_load_and_remove() {
        let (temp_dir, repo) = create_test_repo();
        let june = Period::new(2024, 6).unwrap();
        repo.upsert(budget(Category::Healthcare, 5000, june)).unwrap();
        repo.save().unwrap();

        let repo2 = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        repo2.load().unwrap();
        assert!(repo2.get(Category::Healthcare, june).unwrap().is_some());

        assert!(repo2.remove(Category::Healthcare, june).unwrap().is_some());
        assert!(repo2.remove(Category::Healthcare, june).unwrap().is_none());
    }

    #[test]
    fn test_load_rejects_duplicates() {
        let (temp_dir, repo) = create_test_repo();
        let path = temp_dir.path().join("budgets.json");
        std::fs::write(
            &path,
            r#"{"budgets": [
                {"category": "Food & Dining", "amount": 100, "period": "2024-06"},
                {"category": "Food & Dining", "amount": 200, "period": "2024-06"}
            ]}"#,
        )
        .unwrap();

        assert!(repo.load().unwrap_err().is_validation());
    }
}
