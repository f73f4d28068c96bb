//! Training corpus persistence
//!
//! Stores labeled examples, with their provenance, in corpus.json along with
//! the corpus version, so versions keep increasing across runs.

use std::path::PathBuf;

use crate::classifier::{CorpusSnapshot, TrainingCorpus};
use crate::error::TallyResult;
use crate::models::TrainingExample;

use super::json_file::JsonFile;

/// Version header and examples, written together in one save
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CorpusData {
    #[serde(default)]
    version: u64,
    #[serde(default)]
    examples: Vec<TrainingExample>,
}

/// Repository for the training corpus
pub struct CorpusRepository {
    file: JsonFile<CorpusData>,
}

impl CorpusRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    /// Whether a corpus has been saved before
    pub fn exists(&self) -> bool {
        self.file.exists()
    }

    /// Load the stored corpus
    ///
    /// A missing file yields the built-in seed corpus, so a fresh install
    /// can categorize immediately.
    pub fn load(&self) -> TallyResult<TrainingCorpus> {
        match self.file.load()? {
            Some(data) => TrainingCorpus::from_examples(data.examples, data.version),
            None => Ok(TrainingCorpus::with_default_seeds()),
        }
    }

    /// Save a snapshot of the corpus
    pub fn save(&self, snapshot: &CorpusSnapshot) -> TallyResult<()> {
        let data = CorpusData {
            version: snapshot.version(),
            examples: snapshot.examples().to_vec(),
        };
        self.file.save(&data)
    }
}
