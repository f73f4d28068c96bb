//! Tally - expense categorization and budget variance tracking
//!
//! This library provides the core functionality for the Tally command-line
//! application. Expenses are categorized by a multinomial Naive Bayes
//! classifier over TF-IDF features, trained on a labeled corpus of seed
//! examples and user corrections, and monthly spending is compared against
//! per-category budgets.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `logging`: Diagnostic tracing setup
//! - `models`: Core data models (categories, transactions, budgets, etc.)
//! - `classifier`: Feature encoding, the Naive Bayes model, the training
//!   corpus, and the categorization service
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `reports`: Budget variance and spending reports
//! - `export`: CSV transaction export and corpus backups
//! - `audit`: Audit logging system
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tally::classifier::{CategorizationService, TrainingCorpus};
//!
//! let corpus = Arc::new(TrainingCorpus::with_default_seeds());
//! let service = CategorizationService::fitted(corpus)?;
//! let result = service.categorize("uber ride downtown");
//! ```

pub mod audit;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::TallyError;
