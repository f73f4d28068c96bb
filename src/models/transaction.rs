//! Transaction model
//!
//! An expense: a positive amount spent on a date, a free-text description,
//! and the category assigned to it either by the user or by the classifier.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::category::Category;
use super::ids::TransactionId;
use super::money::Money;
use crate::error::TallyError;

/// Longest description accepted on a transaction
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// How a transaction was paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    CreditCard,
    DebitCard,
    BankTransfer,
    DigitalWallet,
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 6] = [
        PaymentMethod::Cash,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::BankTransfer,
        PaymentMethod::DigitalWallet,
        PaymentMethod::Other,
    ];
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Cash => "Cash",
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::BankTransfer => "Bank Transfer",
            Self::DigitalWallet => "Digital Wallet",
            Self::Other => "Other",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for PaymentMethod {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_lowercase())
            .collect();

        Self::ALL
            .iter()
            .copied()
            .find(|m| {
                let label: String = m
                    .to_string()
                    .chars()
                    .filter(|c| c.is_alphanumeric())
                    .flat_map(|c| c.to_lowercase())
                    .collect();
                label == key
            })
            .ok_or_else(|| TallyError::Validation(format!("Unknown payment method: {}", s)))
    }
}

/// Where a transaction's category came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryAssignment {
    /// Chosen by the user
    #[default]
    Manual,
    /// Predicted by the classifier with the given confidence
    Classifier { confidence: f64 },
    /// The classifier was not confident enough; the fallback was used
    Fallback { confidence: f64 },
}

impl CategoryAssignment {
    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Manual)
    }
}

/// Validated input for creating a transaction
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: Money,
    pub description: String,
    /// Explicit category; `None` asks for automatic categorization
    pub category: Option<Category>,
    pub payment_method: PaymentMethod,
}

impl NewTransaction {
    /// Build and validate a new transaction
    pub fn new(
        date: NaiveDate,
        amount: Money,
        description: impl Into<String>,
        category: Option<Category>,
        payment_method: PaymentMethod,
    ) -> Result<Self, TallyError> {
        let input = Self {
            date,
            amount,
            description: description.into().trim().to_string(),
            category,
            payment_method,
        };
        input.validate()?;
        Ok(input)
    }

    /// Check amount and description constraints
    pub fn validate(&self) -> Result<(), TallyError> {
        if !self.amount.is_positive() {
            return Err(TallyError::Validation(format!(
                "Expense amount must be positive, got {}",
                self.amount
            )));
        }
        if self.amount > Money::MAX_AMOUNT {
            return Err(TallyError::Validation(format!(
                "Expense amount {} exceeds the maximum of {}",
                self.amount,
                Money::MAX_AMOUNT
            )));
        }
        if self.description.trim().is_empty() {
            return Err(TallyError::Validation("Description cannot be empty".into()));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(TallyError::Validation(format!(
                "Description is longer than {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
        Ok(())
    }
}

/// A recorded expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Transaction date
    pub date: NaiveDate,

    /// Amount spent (positive)
    pub amount: Money,

    /// Free-text description, the classifier's input
    pub description: String,

    /// Assigned spending category
    pub category: Category,

    /// How the category was assigned
    #[serde(default)]
    pub assignment: CategoryAssignment,

    #[serde(default)]
    pub payment_method: PaymentMethod,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a transaction from validated input and its resolved category
    pub fn new(input: NewTransaction, category: Category, assignment: CategoryAssignment) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            date: input.date,
            amount: input.amount,
            description: input.description,
            category,
            assignment,
            payment_method: input.payment_method,
            created_at: now,
            updated_at: now,
        }
    }

    /// Assign a category chosen by the user
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.assignment = CategoryAssignment::Manual;
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} [{}]",
            self.date.format("%Y-%m-%d"),
            self.amount,
            self.description,
            self.category
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn test_new_transaction_trims_description() {
        let input = NewTransaction::new(
            june(3),
            Money::from_cents(1299),
            "  pizza delivery  ",
            None,
            PaymentMethod::Cash,
        )
        .unwrap();
        assert_eq!(input.description, "pizza delivery");
    }

    #[test]
    fn test_new_transaction_rejects_amount_above_cap() {
        let huge = Money::parse("10000000000000000").unwrap();
        let err = NewTransaction::new(june(3), huge, "yacht", None, PaymentMethod::Cash)
            .unwrap_err();
        assert!(err.is_validation());

        assert!(
            NewTransaction::new(june(3), Money::MAX_AMOUNT, "yacht", None, PaymentMethod::Cash)
                .is_ok()
        );
    }

    #[test]
    fn test_new_transaction_rejects_non_positive_amount() {
        let err = NewTransaction::new(june(3), Money::zero(), "coffee", None, PaymentMethod::Cash)
            .unwrap_err();
        assert!(err.is_validation());

        let err = NewTransaction::new(
            june(3),
            Money::from_cents(-100),
            "refund",
            None,
            PaymentMethod::Cash,
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_new_transaction_rejects_blank_description() {
        let err = NewTransaction::new(june(3), Money::from_cents(100), "   ", None, PaymentMethod::Cash)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_set_category_marks_manual() {
        let input =
            NewTransaction::new(june(3), Money::from_cents(500), "uber ride", None, PaymentMethod::Cash)
                .unwrap();
        let mut txn = Transaction::new(
            input,
            Category::Transportation,
            CategoryAssignment::Classifier { confidence: 0.8 },
        );
        assert!(!txn.assignment.is_manual());

        txn.set_category(Category::Travel);
        assert_eq!(txn.category, Category::Travel);
        assert!(txn.assignment.is_manual());
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("credit card".parse::<PaymentMethod>().unwrap(), PaymentMethod::CreditCard);
        assert_eq!("Digital-Wallet".parse::<PaymentMethod>().unwrap(), PaymentMethod::DigitalWallet);
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_serialization_round_trip() {
        let input = NewTransaction::new(
            june(10),
            Money::from_cents(4500),
            "electricity bill",
            Some(Category::BillsUtilities),
            PaymentMethod::BankTransfer,
        )
        .unwrap();
        let txn = Transaction::new(input, Category::BillsUtilities, CategoryAssignment::Manual);

        let json = serde_json::to_string(&txn).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, txn.id);
        assert_eq!(back.category, Category::BillsUtilities);
        assert_eq!(back.payment_method, PaymentMethod::BankTransfer);
    }
}
