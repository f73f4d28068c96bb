//! Corpus service
//!
//! Wraps the categorization service's corpus with persistence and auditing:
//! every change to the training examples is saved to corpus.json and noted
//! in the audit journal.

use tracing::info;

use crate::audit::{EntityType, Operation};
use crate::classifier::{CategorizationService, ClassifierModel, CorpusSnapshot};
use crate::error::TallyResult;
use crate::models::{Category, LabeledText, TrainingExample};
use crate::storage::Storage;

/// Counts describing the corpus and the active model
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusStats {
    pub version: u64,
    pub examples: usize,
    pub corrections: usize,
    pub by_category: Vec<(Category, usize)>,
    /// Corpus version of the active model, if one is fitted
    pub model_version: Option<u64>,
    pub vocabulary_size: usize,
}

impl CorpusStats {
    /// Whether corrections were recorded since the last refit
    pub fn is_stale(&self) -> bool {
        self.model_version != Some(self.version)
    }
}

/// What a backup import did to the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Records appended to the existing examples
    Appended(usize),
    /// The corpus replaced by the backup's records
    Restored(usize),
}

/// Service for training corpus maintenance
pub struct CorpusService<'a> {
    storage: &'a Storage,
    categorizer: &'a CategorizationService,
}

impl<'a> CorpusService<'a> {
    pub fn new(storage: &'a Storage, categorizer: &'a CategorizationService) -> Self {
        Self {
            storage,
            categorizer,
        }
    }

    /// Record a user correction and persist the corpus
    pub fn record_correction(&self, text: &str, label: Category) -> TallyResult<TrainingExample> {
        let example = self.categorizer.record_correction(text, label)?;
        self.persist()?;

        self.storage.log_event(
            Operation::Learn,
            EntityType::Corpus,
            format!("v{}", self.categorizer.corpus().version()),
            format!("correction '{}' -> {}", example.text, example.label),
        )?;
        Ok(example)
    }

    /// Append imported examples as seeds and persist the corpus
    pub fn import(&self, records: Vec<LabeledText>) -> TallyResult<usize> {
        let added = self.categorizer.corpus().add_seed_examples(records)?;
        if added > 0 {
            self.persist()?;
            self.storage.log_event(
                Operation::Learn,
                EntityType::Corpus,
                format!("v{}", self.categorizer.corpus().version()),
                format!("imported {} examples", added),
            )?;
        }
        Ok(added)
    }

    /// Replace the corpus with a backup's records and persist it
    pub fn restore(&self, records: Vec<LabeledText>) -> TallyResult<usize> {
        let count = self.categorizer.corpus().replace_with_seeds(records)?;
        self.persist()?;
        self.storage.log_event(
            Operation::Restore,
            EntityType::Corpus,
            format!("v{}", self.categorizer.corpus().version()),
            format!("restored {} examples", count),
        )?;
        Ok(count)
    }

    /// Load a backup into the corpus
    ///
    /// Restores when `replace` is set or when the corpus still holds only
    /// the built-in seeds; appends otherwise.
    pub fn import_backup(
        &self,
        records: Vec<LabeledText>,
        replace: bool,
    ) -> TallyResult<ImportOutcome> {
        if replace || self.categorizer.corpus().is_default_seeds() {
            self.restore(records).map(ImportOutcome::Restored)
        } else {
            self.import(records).map(ImportOutcome::Appended)
        }
    }

    /// Remove all user corrections and persist the corpus
    pub fn purge_corrections(&self) -> TallyResult<usize> {
        let removed = self.categorizer.corpus().purge_corrections()?;
        if removed > 0 {
            self.persist()?;
            self.storage.log_event(
                Operation::Purge,
                EntityType::Corpus,
                format!("v{}", self.categorizer.corpus().version()),
                format!("removed {} corrections", removed),
            )?;
        }
        Ok(removed)
    }

    /// Fit a new model and make it current
    pub fn refit(&self) -> TallyResult<std::sync::Arc<ClassifierModel>> {
        let model = self.categorizer.refit()?;
        self.storage.log_event(
            Operation::Refit,
            EntityType::Model,
            format!("v{}", model.corpus_version()),
            format!(
                "{} examples, {} terms",
                model.total_examples(),
                model.vocabulary().len()
            ),
        )?;
        Ok(model)
    }

    /// Snapshot of the current corpus
    pub fn snapshot(&self) -> TallyResult<CorpusSnapshot> {
        self.categorizer.corpus().snapshot()
    }

    pub fn stats(&self) -> TallyResult<CorpusStats> {
        let snapshot = self.snapshot()?;
        let model = self.categorizer.current_model();

        Ok(CorpusStats {
            version: snapshot.version(),
            examples: snapshot.len(),
            corrections: snapshot.correction_count(),
            by_category: snapshot.counts_by_category(),
            model_version: model.as_ref().map(|m| m.corpus_version()),
            vocabulary_size: model.as_ref().map(|m| m.vocabulary().len()).unwrap_or(0),
        })
    }

    fn persist(&self) -> TallyResult<()> {
        let snapshot = self.snapshot()?;
        self.storage.corpus.save(&snapshot)?;
        info!(version = snapshot.version(), examples = snapshot.len(), "saved corpus");
        Ok(())
    }
}
