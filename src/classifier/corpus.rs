//! Training corpus manager
//!
//! Owns the labeled examples the classifier learns from. The corpus is
//! append-only: seeds load once, user corrections accumulate, and only an
//! explicit [`TrainingCorpus::purge_corrections`] or a restore from backup
//! ([`TrainingCorpus::replace_with_seeds`]) removes anything. Every
//! change bumps a version number so a fitted model can be traced back to the
//! exact snapshot it came from.

use std::sync::{Arc, RwLock};

use serde::ser::{Serialize, SerializeSeq, Serializer};
use tracing::info;

use super::encoder::{SparseVector, Vocabulary};
use super::naive_bayes::ClassifierModel;
use super::seed::default_seed_examples;
use crate::error::{TallyError, TallyResult};
use crate::models::{Category, ExampleSource, LabeledText, TrainingExample};

#[derive(Debug, Default)]
struct CorpusState {
    examples: Vec<TrainingExample>,
    version: u64,
}

/// An immutable view of the corpus at one version
#[derive(Debug, Clone)]
pub struct CorpusSnapshot {
    version: u64,
    examples: Arc<[TrainingExample]>,
}

impl CorpusSnapshot {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn examples(&self) -> &[TrainingExample] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// The portable `{text, label}` records, in corpus order
    pub fn to_records(&self) -> Vec<LabeledText> {
        self.examples.iter().map(LabeledText::from).collect()
    }

    /// Number of examples per category, in category order
    pub fn counts_by_category(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .map(|&c| (c, self.examples.iter().filter(|e| e.label == c).count()))
            .collect()
    }

    /// Number of examples recorded as user corrections
    pub fn correction_count(&self) -> usize {
        self.examples.iter().filter(|e| e.is_correction()).count()
    }

    /// Fit a classifier on this snapshot
    pub fn fit(&self) -> TallyResult<ClassifierModel> {
        if self.examples.is_empty() {
            return Err(TallyError::EmptyCorpus);
        }

        let texts: Vec<&str> = self.examples.iter().map(|e| e.text.as_str()).collect();
        let vocabulary = Vocabulary::fit(&texts);
        let features: Vec<(SparseVector, Category)> = self
            .examples
            .iter()
            .map(|e| (vocabulary.transform(&e.text), e.label))
            .collect();

        ClassifierModel::fit(&features, vocabulary, &Category::ALL, self.version)
    }
}

/// Serializes as a plain list of `{text, label}` records
impl Serialize for CorpusSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.examples.len()))?;
        for example in self.examples.iter() {
            seq.serialize_element(&LabeledText::from(example))?;
        }
        seq.end()
    }
}

/// The versioned, append-only set of training examples
#[derive(Debug, Default)]
pub struct TrainingCorpus {
    state: RwLock<CorpusState>,
}

impl TrainingCorpus {
    /// Create an empty corpus
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a corpus holding the built-in seed examples
    pub fn with_default_seeds() -> Self {
        let examples = default_seed_examples()
            .into_iter()
            .map(|r| TrainingExample {
                text: r.text,
                label: r.label,
                source: ExampleSource::Seed,
            })
            .collect();
        Self {
            state: RwLock::new(CorpusState {
                examples,
                version: 1,
            }),
        }
    }

    /// Restore a corpus from stored examples, keeping their provenance
    ///
    /// A non-empty corpus is at least version 1 even if `version` was not
    /// stored.
    pub fn from_examples(examples: Vec<TrainingExample>, version: u64) -> TallyResult<Self> {
        for example in &examples {
            if example.text.trim().is_empty() {
                return Err(TallyError::Validation(
                    "Training example text cannot be empty".into(),
                ));
            }
        }
        let version = version.max(u64::from(!examples.is_empty()));
        Ok(Self {
            state: RwLock::new(CorpusState { examples, version }),
        })
    }

    /// Append seed examples
    ///
    /// All records are validated before any is appended, so a bad record
    /// leaves the corpus untouched. Returns the number of examples added.
    pub fn add_seed_examples<I>(&self, records: I) -> TallyResult<usize>
    where
        I: IntoIterator<Item = LabeledText>,
    {
        let examples = records
            .into_iter()
            .map(|r| TrainingExample::seed(r.text, r.label))
            .collect::<TallyResult<Vec<_>>>()?;

        if examples.is_empty() {
            return Ok(0);
        }

        let added = examples.len();
        let mut state = self.write_state()?;
        state.examples.extend(examples);
        state.version += 1;
        Ok(added)
    }

    /// Replace every example with the given records, as seeds
    ///
    /// Used to restore a backup. Records are validated first; on error the
    /// corpus is untouched. Returns the number of examples now held.
    pub fn replace_with_seeds<I>(&self, records: I) -> TallyResult<usize>
    where
        I: IntoIterator<Item = LabeledText>,
    {
        let examples = records
            .into_iter()
            .map(|r| TrainingExample::seed(r.text, r.label))
            .collect::<TallyResult<Vec<_>>>()?;

        let count = examples.len();
        let mut state = self.write_state()?;
        state.examples = examples;
        state.version += 1;
        Ok(count)
    }

    /// Whether the corpus holds exactly the built-in seeds and nothing else
    pub fn is_default_seeds(&self) -> bool {
        let Ok(state) = self.state.read() else {
            return false;
        };
        let defaults = default_seed_examples();
        state.examples.len() == defaults.len()
            && state
                .examples
                .iter()
                .zip(defaults.iter())
                .all(|(e, d)| {
                    e.source == ExampleSource::Seed && e.text == d.text && e.label == d.label
                })
    }

    /// Append a user correction; does not retrain
    pub fn add_correction(&self, text: &str, label: Category) -> TallyResult<TrainingExample> {
        let example = TrainingExample::correction(text.trim(), label)?;

        let mut state = self.write_state()?;
        state.examples.push(example.clone());
        state.version += 1;
        Ok(example)
    }

    /// Remove every user correction, keeping seeds. Returns how many went.
    pub fn purge_corrections(&self) -> TallyResult<usize> {
        let mut state = self.write_state()?;
        let before = state.examples.len();
        state.examples.retain(|e| !e.is_correction());
        let removed = before - state.examples.len();
        if removed > 0 {
            state.version += 1;
        }
        Ok(removed)
    }

    /// Take a consistent snapshot; later appends are not visible in it
    pub fn snapshot(&self) -> TallyResult<CorpusSnapshot> {
        let state = self
            .state
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(CorpusSnapshot {
            version: state.version,
            examples: Arc::from(state.examples.as_slice()),
        })
    }

    /// Fit a new model from a snapshot taken now
    pub fn refit(&self) -> TallyResult<ClassifierModel> {
        let snapshot = self.snapshot()?;
        let model = snapshot.fit()?;
        info!(
            version = snapshot.version(),
            examples = snapshot.len(),
            vocabulary = model.vocabulary().len(),
            "fitted classifier"
        );
        Ok(model)
    }

    /// Current version number
    pub fn version(&self) -> u64 {
        self.state.read().map(|s| s.version).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.examples.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write_state(&self) -> TallyResult<std::sync::RwLockWriteGuard<'_, CorpusState>> {
        self.state
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}
