//! TF-IDF feature encoding
//!
//! Text is lower-cased, split on every non-alphanumeric character, and tokens
//! shorter than two characters are dropped. A [`Vocabulary`] fitted on a
//! corpus maps each token to a feature index and carries its smoothed inverse
//! document frequency:
//!
//! ```text
//! idf(t) = ln((1 + N) / (1 + df(t))) + 1
//! ```
//!
//! Feature indices follow the lexicographic order of the tokens, so fitting
//! the same corpus always yields the same vocabulary.

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Shortest token kept by [`tokenize`], in characters
pub const MIN_TOKEN_CHARS: usize = 2;

/// Split text into lower-case alphanumeric tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// A sparse feature vector: (feature index, weight) pairs in index order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Whether no feature carries weight (empty or fully out-of-vocabulary text)
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weight of a single feature (0 when absent)
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }
}

/// Token to feature index mapping with per-feature IDF weights
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
    idf: Vec<f64>,
    documents: usize,
}

impl Vocabulary {
    /// Learn the vocabulary and document frequencies of a corpus
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Self {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();

        for document in corpus {
            let unique: BTreeSet<String> = tokenize(document.as_ref()).into_iter().collect();
            for token in unique {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        let documents = corpus.len();
        let n = documents as f64;

        let mut terms = Vec::with_capacity(document_frequency.len());
        let mut idf = Vec::with_capacity(document_frequency.len());
        let mut index = HashMap::with_capacity(document_frequency.len());

        // BTreeMap iteration is sorted, which fixes the index assignment
        for (position, (term, df)) in document_frequency.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            index.insert(term.clone(), position);
            terms.push(term);
        }

        Self {
            terms,
            index,
            idf,
            documents,
        }
    }

    /// Encode text as TF-IDF weights; unseen tokens contribute nothing
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(&idx) = self.index.get(&token) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }

        let entries = counts
            .into_iter()
            .map(|(idx, count)| (idx, count as f64 * self.idf[idx]))
            .collect();

        SparseVector { entries }
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of documents the vocabulary was fitted on
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Feature index of a token
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Token at a feature index
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// IDF weight of a feature index
    pub fn idf(&self, index: usize) -> Option<f64> {
        self.idf.get(index).copied()
    }
}
