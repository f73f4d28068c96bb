//! Budget service
//!
//! Sets and removes monthly category budgets and builds variance reports
//! from stored budgets and transactions.

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{Budget, Category, Money, Period};
use crate::reports::VarianceReport;
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Set the budget for a category in a period, replacing any existing one
    pub fn set(&self, category: Category, amount: Money, period: Period) -> TallyResult<Budget> {
        let budget = Budget::new(category, amount, period)?;
        let replaced = self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        let key = budget_key(&budget);
        match replaced {
            Some(before) => self.storage.log_update(
                EntityType::Budget,
                key,
                Some(category.to_string()),
                &before,
                &budget,
            )?,
            None => self.storage.log_create(
                EntityType::Budget,
                key,
                Some(category.to_string()),
                &budget,
            )?,
        }

        Ok(budget)
    }

    /// Budgets for a period, in category order
    pub fn list(&self, period: Period) -> TallyResult<Vec<Budget>> {
        self.storage.budgets.get_for_period(period)
    }

    /// Remove the budget for a category in a period
    pub fn remove(&self, category: Category, period: Period) -> TallyResult<Budget> {
        let removed = self
            .storage
            .budgets
            .remove(category, period)?
            .ok_or_else(|| TallyError::budget_not_found(format!("{} in {}", category, period)))?;
        self.storage.budgets.save()?;

        self.storage.log_delete(
            EntityType::Budget,
            budget_key(&removed),
            Some(category.to_string()),
            &removed,
        )?;
        Ok(removed)
    }

    /// Budgeted versus actual spending for a period
    pub fn variance(&self, period: Period) -> TallyResult<VarianceReport> {
        let transactions = self.storage.transactions.get_for_period(period)?;
        let budgets = self.list(period)?;
        VarianceReport::generate(&transactions, &budgets, period)
    }
}

fn budget_key(budget: &Budget) -> String {
    format!("{}/{}", budget.period, budget.category.ident())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::TallyPaths;
    use crate::models::{CategoryAssignment, NewTransaction, PaymentMethod, Transaction};
    use crate::reports::VarianceStatus;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn june() -> Period {
        Period::new(2024, 6).unwrap()
    }

    #[test]
    fn test_set_replaces_and_audits() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        service
            .set(Category::FoodDining, Money::from_cents(20000), june())
            .unwrap();
        service
            .set(Category::FoodDining, Money::from_cents(25000), june())
            .unwrap();

        let budgets = service.list(june()).unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].amount, Money::from_cents(25000));

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[1].operation, Operation::Update);
        assert_eq!(entries[1].detail.as_deref(), Some("amount: 20000 -> 25000"));
    }

    #[test]
    fn test_negative_budget_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let err = service
            .set(Category::Travel, Money::from_cents(-1), june())
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_remove_missing_budget() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        assert!(service
            .remove(Category::Travel, june())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_variance_from_storage() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        service
            .set(Category::FoodDining, Money::from_cents(20000), june())
            .unwrap();

        for (day, cents) in [(3, 12000), (17, 9550)] {
            let input = NewTransaction::new(
                NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
                Money::from_cents(cents),
                "groceries",
                Some(Category::FoodDining),
                PaymentMethod::DebitCard,
            )
            .unwrap();
            storage
                .transactions
                .upsert(Transaction::new(
                    input,
                    Category::FoodDining,
                    CategoryAssignment::Manual,
                ))
                .unwrap();
        }

        let report = service.variance(june()).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].status, VarianceStatus::Over);
        assert_eq!(report.records[0].variance, Money::from_cents(1550));
    }
}
