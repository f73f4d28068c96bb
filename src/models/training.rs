//! Labeled training examples
//!
//! The classifier learns from (text, category) pairs. Each stored example
//! remembers whether it shipped as a seed or came from a user correction;
//! the portable export shape ([`LabeledText`]) drops that provenance.

use serde::{Deserialize, Serialize};

use super::category::Category;
use crate::error::TallyError;

/// Where a training example came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExampleSource {
    /// Loaded at initialization (built-in defaults or an imported backup)
    #[default]
    Seed,
    /// Recorded when a user corrected a category
    Correction,
}

/// A stored training example
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub label: Category,
    #[serde(default)]
    pub source: ExampleSource,
}

impl TrainingExample {
    /// Create an example, rejecting blank text
    pub fn new(
        text: impl Into<String>,
        label: Category,
        source: ExampleSource,
    ) -> Result<Self, TallyError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TallyError::Validation(
                "Training example text cannot be empty".into(),
            ));
        }
        Ok(Self {
            text,
            label,
            source,
        })
    }

    pub fn seed(text: impl Into<String>, label: Category) -> Result<Self, TallyError> {
        Self::new(text, label, ExampleSource::Seed)
    }

    pub fn correction(text: impl Into<String>, label: Category) -> Result<Self, TallyError> {
        Self::new(text, label, ExampleSource::Correction)
    }

    pub fn is_correction(&self) -> bool {
        self.source == ExampleSource::Correction
    }
}

/// The portable `{text, label}` record used for backup and import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledText {
    pub text: String,
    pub label: Category,
}

impl LabeledText {
    pub fn new(text: impl Into<String>, label: Category) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

impl From<&TrainingExample> for LabeledText {
    fn from(example: &TrainingExample) -> Self {
        Self {
            text: example.text.clone(),
            label: example.label,
        }
    }
}
