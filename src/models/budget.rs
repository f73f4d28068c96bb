//! Budget model
//!
//! A spending limit for one category in one calendar month. At most one
//! budget exists per (category, period).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;
use super::money::Money;
use super::period::Period;
use crate::error::TallyError;

/// A monthly budget for a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// The category this budget limits
    pub category: Category,

    /// Amount budgeted for the period
    pub amount: Money,

    /// The month the budget applies to
    pub period: Period,
}

impl Budget {
    /// Create a budget, rejecting negative amounts
    pub fn new(category: Category, amount: Money, period: Period) -> Result<Self, TallyError> {
        let budget = Self {
            category,
            amount,
            period,
        };
        budget.validate()?;
        Ok(budget)
    }

    /// The uniqueness key of a budget
    pub fn key(&self) -> (Category, Period) {
        (self.category, self.period)
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), TallyError> {
        if self.amount.is_negative() {
            return Err(TallyError::Validation(format!(
                "Budget for {} in {} cannot be negative ({})",
                self.category, self.period, self.amount
            )));
        }
        if self.amount > Money::MAX_AMOUNT {
            return Err(TallyError::Validation(format!(
                "Budget for {} in {} exceeds the maximum of {}",
                self.category,
                self.period,
                Money::MAX_AMOUNT
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.period, self.category, self.amount)
    }
}
