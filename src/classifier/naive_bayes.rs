//! Multinomial Naive Bayes over TF-IDF features
//!
//! Each category's token likelihoods come from the TF-IDF mass its training
//! examples put on each token, with additive smoothing so no (token, category)
//! pair has zero probability. Priors are smoothed the same way over example
//! counts, so a category with no examples keeps a small prior and stays
//! selectable once examples arrive.
//!
//! A fitted [`ClassifierModel`] is immutable. Refitting builds a new one.

use std::collections::BTreeMap;

use super::encoder::{SparseVector, Vocabulary};
use crate::error::{TallyError, TallyResult};
use crate::models::Category;

/// Additive smoothing applied to every (token, category) mass
pub const LIKELIHOOD_SMOOTHING: f64 = 1.0;

/// Additive smoothing applied to every category's example count
pub const PRIOR_SMOOTHING: f64 = 1.0;

/// Probability per category, summing to 1
pub type Distribution = BTreeMap<Category, f64>;

/// Fitted classifier parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierModel {
    vocabulary: Vocabulary,
    categories: Vec<Category>,
    /// Indexed like `categories`
    log_priors: Vec<f64>,
    /// `[category][feature]`
    log_likelihoods: Vec<Vec<f64>>,
    /// Training examples per category, indexed like `categories`
    example_counts: Vec<usize>,
    /// Version of the corpus snapshot this model was fitted on
    corpus_version: u64,
}

impl ClassifierModel {
    /// Fit a model on encoded training examples
    ///
    /// `categories` is the category set the model can predict; the fallback
    /// category is added if missing. Every label must belong to the set.
    pub fn fit(
        features: &[(SparseVector, Category)],
        vocabulary: Vocabulary,
        categories: &[Category],
        corpus_version: u64,
    ) -> TallyResult<Self> {
        if features.is_empty() {
            return Err(TallyError::EmptyCorpus);
        }

        let mut categories: Vec<Category> = categories.to_vec();
        if !categories.contains(&Category::FALLBACK) {
            categories.push(Category::FALLBACK);
        }
        categories.sort();
        categories.dedup();

        let k = categories.len();
        let v = vocabulary.len();
        let mut counts = vec![0usize; k];
        let mut mass = vec![vec![0.0f64; v]; k];

        for (vector, label) in features {
            let c = categories
                .binary_search(label)
                .map_err(|_| TallyError::InvalidLabel(label.to_string()))?;
            counts[c] += 1;
            for &(idx, weight) in vector.entries() {
                if idx < v {
                    mass[c][idx] += weight;
                }
            }
        }

        let n = features.len() as f64;
        let prior_denominator = n + PRIOR_SMOOTHING * k as f64;
        let log_priors = counts
            .iter()
            .map(|&count| ((count as f64 + PRIOR_SMOOTHING) / prior_denominator).ln())
            .collect();

        let log_likelihoods = mass
            .iter()
            .map(|row| {
                let total: f64 = row.iter().sum();
                let denominator = total + LIKELIHOOD_SMOOTHING * v as f64;
                row.iter()
                    .map(|&m| ((m + LIKELIHOOD_SMOOTHING) / denominator).ln())
                    .collect()
            })
            .collect();

        Ok(Self {
            vocabulary,
            categories,
            log_priors,
            log_likelihoods,
            example_counts: counts,
            corpus_version,
        })
    }

    /// Probability of each category for an encoded input
    ///
    /// Every category receives a strictly positive probability, including for
    /// the zero vector, where the result reduces to the priors.
    pub fn predict(&self, vector: &SparseVector) -> Distribution {
        let scores: Vec<f64> = self
            .log_priors
            .iter()
            .zip(&self.log_likelihoods)
            .map(|(log_prior, row)| {
                let log_likelihood: f64 = vector
                    .entries()
                    .iter()
                    .filter_map(|&(idx, weight)| row.get(idx).map(|lp| weight * lp))
                    .sum();
                log_prior + log_likelihood
            })
            .collect();

        self.categories
            .iter()
            .copied()
            .zip(softmax(&scores))
            .collect()
    }

    /// Encode text with this model's vocabulary and predict
    pub fn predict_text(&self, text: &str) -> Distribution {
        self.predict(&self.vocabulary.transform(text))
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// The category set this model was trained against
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Training examples seen for a category
    pub fn example_count(&self, category: Category) -> usize {
        self.categories
            .binary_search(&category)
            .map(|i| self.example_counts[i])
            .unwrap_or(0)
    }

    /// Total training examples
    pub fn total_examples(&self) -> usize {
        self.example_counts.iter().sum()
    }

    pub fn corpus_version(&self) -> u64 {
        self.corpus_version
    }

    /// Whether two models were fitted to identical parameters, whatever
    /// corpus version each was traced to
    pub fn same_parameters(&self, other: &ClassifierModel) -> bool {
        self.vocabulary == other.vocabulary
            && self.categories == other.categories
            && self.log_priors == other.log_priors
            && self.log_likelihoods == other.log_likelihoods
            && self.example_counts == other.example_counts
    }
}

/// Max-shifted softmax that never yields an exact zero
fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores
        .iter()
        .map(|s| (s - max).exp().max(f64::MIN_POSITIVE))
        .collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train(examples: &[(&str, Category)]) -> ClassifierModel {
        let texts: Vec<&str> = examples.iter().map(|(t, _)| *t).collect();
        let vocabulary = Vocabulary::fit(&texts);
        let features: Vec<(SparseVector, Category)> = examples
            .iter()
            .map(|(t, c)| (vocabulary.transform(t), *c))
            .collect();
        ClassifierModel::fit(&features, vocabulary, &Category::ALL, 1).unwrap()
    }

    fn pizza_and_uber() -> ClassifierModel {
        let mut examples = Vec::new();
        for _ in 0..5 {
            examples.push(("pizza delivery", Category::FoodDining));
            examples.push(("uber ride", Category::Transportation));
        }
        train(&examples)
    }

    fn assert_is_distribution(dist: &Distribution) {
        let total: f64 = dist.values().sum();
        assert!((total - 1.0).abs() < 1e-9, "sums to {}", total);
        assert!(dist.values().all(|&p| p > 0.0 && p <= 1.0));
    }

    #[test]
    fn test_same_parameters_ignores_corpus_version() {
        let texts = ["pizza delivery", "uber ride"];
        let fit = |version| {
            let vocabulary = Vocabulary::fit(&texts[..]);
            let features = vec![
                (vocabulary.transform(texts[0]), Category::FoodDining),
                (vocabulary.transform(texts[1]), Category::Transportation),
            ];
            ClassifierModel::fit(&features, vocabulary, &Category::ALL, version).unwrap()
        };

        let v1 = fit(1);
        let v7 = fit(7);
        assert_ne!(v1, v7);
        assert!(v1.same_parameters(&v7));
        assert!(!v1.same_parameters(&pizza_and_uber()));
    }

    #[test]
    fn test_empty_training_set_is_rejected() {
        let result = ClassifierModel::fit(&[], Vocabulary::default(), &Category::ALL, 0);
        assert!(matches!(result, Err(TallyError::EmptyCorpus)));
    }

    #[test]
    fn test_label_outside_category_set_is_rejected() {
        let vocabulary = Vocabulary::fit(&["hotel"]);
        let features = vec![(vocabulary.transform("hotel"), Category::Travel)];
        let result = ClassifierModel::fit(&features, vocabulary, &[Category::FoodDining], 0);
        assert!(matches!(result, Err(TallyError::InvalidLabel(_))));
    }

    #[test]
    fn test_fallback_is_always_in_category_set() {
        let vocabulary = Vocabulary::fit(&["hotel"]);
        let features = vec![(vocabulary.transform("hotel"), Category::Travel)];
        let model = ClassifierModel::fit(&features, vocabulary, &[Category::Travel], 0).unwrap();
        assert_eq!(model.categories(), &[Category::Travel, Category::Miscellaneous]);
    }

    #[test]
    fn test_predict_prefers_matching_category() {
        let model = pizza_and_uber();
        let dist = model.predict_text("grocery store pizza");
        assert_is_distribution(&dist);
        assert!(dist[&Category::FoodDining] > 0.30);
        assert!(dist[&Category::FoodDining] > dist[&Category::Transportation]);
    }

    #[test]
    fn test_no_zero_probabilities() {
        let model = pizza_and_uber();
        for text in ["", "pizza", "uber uber uber uber uber uber uber uber", "zzz qqq"] {
            let dist = model.predict_text(text);
            assert_eq!(dist.len(), Category::ALL.len());
            assert_is_distribution(&dist);
        }
    }

    #[test]
    fn test_extreme_input_does_not_underflow_to_zero() {
        let model = pizza_and_uber();
        let text = "uber ".repeat(5_000);
        let dist = model.predict_text(&text);
        assert!(dist.values().all(|&p| p > 0.0));
        assert!(dist[&Category::Transportation] > 0.99);
    }

    #[test]
    fn test_zero_vector_reduces_to_priors() {
        let model = pizza_and_uber();
        let dist = model.predict(&SparseVector::default());
        // (5 + 1) / (10 + 11) for trained categories, 1 / 21 for the rest
        assert!((dist[&Category::FoodDining] - 6.0 / 21.0).abs() < 1e-12);
        assert!((dist[&Category::Travel] - 1.0 / 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let a = pizza_and_uber();
        let b = pizza_and_uber();
        assert_eq!(a, b);

        let first = a.predict_text("late night pizza");
        let second = a.predict_text("late night pizza");
        for (p, q) in first.values().zip(second.values()) {
            assert_eq!(p.to_bits(), q.to_bits());
        }
    }

    #[test]
    fn test_example_counts() {
        let model = pizza_and_uber();
        assert_eq!(model.example_count(Category::FoodDining), 5);
        assert_eq!(model.example_count(Category::Travel), 0);
        assert_eq!(model.total_examples(), 10);
        assert_eq!(model.corpus_version(), 1);
    }
}
