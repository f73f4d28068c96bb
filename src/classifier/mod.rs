//! Expense categorization
//!
//! Descriptions are encoded as TF-IDF vectors and scored by a multinomial
//! Naive Bayes model fitted on a labeled corpus of seed examples and user
//! corrections. The [`CategorizationService`] is what the rest of the crate
//! talks to.

pub mod corpus;
pub mod encoder;
pub mod naive_bayes;
pub mod seed;
pub mod service;

pub use corpus::{CorpusSnapshot, TrainingCorpus};
pub use encoder::{tokenize, SparseVector, Vocabulary};
pub use naive_bayes::{ClassifierModel, Distribution};
pub use seed::default_seed_examples;
pub use service::{CategorizationResult, CategorizationService, Prediction, MIN_CONFIDENCE};
