//! Categorization service
//!
//! The entry point callers use to categorize descriptions. It holds the
//! current model behind a lock that is only taken long enough to clone an
//! `Arc`, so a categorization in flight finishes against the model it started
//! with while a refit swaps in a new one.
//!
//! `categorize` always answers: low confidence, empty text, or a missing
//! model all resolve to the fallback category instead of an error.

use std::cmp::Ordering;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::corpus::TrainingCorpus;
use super::encoder::tokenize;
use super::naive_bayes::{ClassifierModel, Distribution};
use crate::error::{TallyError, TallyResult};
use crate::models::{Category, CategoryAssignment, TrainingExample};

/// Predictions below this confidence fall back to [`Category::FALLBACK`]
pub const MIN_CONFIDENCE: f64 = 0.30;

/// What callers see for one description
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategorizationResult {
    pub category: Category,
    /// The classifier's probability for its top-ranked category
    pub confidence: f64,
    pub is_fallback: bool,
}

impl CategorizationResult {
    fn fallback(confidence: f64) -> Self {
        Self {
            category: Category::FALLBACK,
            confidence,
            is_fallback: true,
        }
    }

    /// How this result should be recorded on a transaction
    pub fn assignment(&self) -> CategoryAssignment {
        if self.is_fallback {
            CategoryAssignment::Fallback {
                confidence: self.confidence,
            }
        } else {
            CategoryAssignment::Classifier {
                confidence: self.confidence,
            }
        }
    }
}

/// The raw classifier output behind a result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Top category before the confidence threshold is applied
    pub top_category: Category,
    pub top_score: f64,
    pub distribution: Distribution,
    /// Corpus version of the model that produced this prediction
    pub corpus_version: u64,
}

/// Categorizes descriptions and manages the active model
#[derive(Debug)]
pub struct CategorizationService {
    corpus: Arc<TrainingCorpus>,
    model: RwLock<Option<Arc<ClassifierModel>>>,
}

impl CategorizationService {
    /// Create a service with no fitted model yet
    pub fn new(corpus: Arc<TrainingCorpus>) -> Self {
        Self {
            corpus,
            model: RwLock::new(None),
        }
    }

    /// Create a service and fit an initial model from the corpus
    pub fn fitted(corpus: Arc<TrainingCorpus>) -> TallyResult<Self> {
        let service = Self::new(corpus);
        service.refit()?;
        Ok(service)
    }

    /// The corpus this service learns from
    pub fn corpus(&self) -> &Arc<TrainingCorpus> {
        &self.corpus
    }

    /// The model currently used for categorization
    pub fn current_model(&self) -> Option<Arc<ClassifierModel>> {
        match self.model.read() {
            Ok(guard) => guard.clone(),
            // Writers only ever store a whole Arc, so the value is intact
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Raw prediction for a description, or `None` without a model
    pub fn predict(&self, text: &str) -> Option<Prediction> {
        let model = self.current_model()?;
        let distribution = model.predict_text(text);
        let (top_category, top_score) = select_top(&distribution, &model)?;
        Some(Prediction {
            top_category,
            top_score,
            distribution,
            corpus_version: model.corpus_version(),
        })
    }

    /// Assign a category to a description
    pub fn categorize(&self, text: &str) -> CategorizationResult {
        if tokenize(text).is_empty() {
            warn!(input = text, "malformed input: no usable tokens, using fallback");
            return CategorizationResult::fallback(0.0);
        }

        let Some(prediction) = self.predict(text) else {
            warn!("no classifier model fitted, using fallback");
            return CategorizationResult::fallback(0.0);
        };

        if prediction.top_score < MIN_CONFIDENCE {
            debug!(
                raw_category = %prediction.top_category,
                raw_score = prediction.top_score,
                "confidence below threshold, using fallback"
            );
            return CategorizationResult::fallback(prediction.top_score);
        }

        debug!(
            category = %prediction.top_category,
            confidence = prediction.top_score,
            "categorized"
        );
        CategorizationResult {
            category: prediction.top_category,
            confidence: prediction.top_score,
            is_fallback: false,
        }
    }

    /// Record the right category for a description; takes effect at the next refit
    pub fn record_correction(&self, text: &str, label: Category) -> TallyResult<TrainingExample> {
        let example = self.corpus.add_correction(text, label)?;
        debug!(label = %label, version = self.corpus.version(), "recorded correction");
        Ok(example)
    }

    /// Fit a new model from the corpus and make it current
    ///
    /// On failure the previously active model stays in use.
    pub fn refit(&self) -> TallyResult<Arc<ClassifierModel>> {
        let model = Arc::new(self.corpus.refit()?);

        let mut guard = self
            .model
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *guard = Some(Arc::clone(&model));
        drop(guard);

        info!(version = model.corpus_version(), "activated classifier model");
        Ok(model)
    }

    /// Whether the active model reflects the latest corpus version
    pub fn is_stale(&self) -> bool {
        match self.current_model() {
            Some(model) => model.corpus_version() != self.corpus.version(),
            None => !self.corpus.is_empty(),
        }
    }
}

/// Arg-max of a distribution with deterministic tie-breaking
///
/// Scores equal within floating-point tolerance go to the category with more
/// training examples, then to the lexicographically smaller category name.
fn select_top(distribution: &Distribution, model: &ClassifierModel) -> Option<(Category, f64)> {
    distribution
        .iter()
        .map(|(&category, &score)| (category, score))
        .reduce(|best, candidate| {
            if rank(candidate, best, model) == Ordering::Greater {
                candidate
            } else {
                best
            }
        })
}

fn rank(a: (Category, f64), b: (Category, f64), model: &ClassifierModel) -> Ordering {
    let (cat_a, score_a) = a;
    let (cat_b, score_b) = b;

    let tolerance = f64::EPSILON * score_a.abs().max(score_b.abs());
    if (score_a - score_b).abs() > tolerance {
        return score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal);
    }

    model
        .example_count(cat_a)
        .cmp(&model.example_count(cat_b))
        // Smaller name ranks higher
        .then_with(|| cat_b.name().cmp(cat_a.name()))
}
