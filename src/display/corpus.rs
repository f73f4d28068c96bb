//! Classifier and corpus display formatting
//!
//! Renders categorization answers (optionally with the full probability
//! distribution), the training corpus, and corpus statistics.

use crate::classifier::{CategorizationResult, CorpusSnapshot, Prediction, MIN_CONFIDENCE};
use crate::models::ExampleSource;
use crate::services::CorpusStats;

/// Format the answer for one description
///
/// With a prediction, every category's probability is listed, highest first.
pub fn format_categorization(
    text: &str,
    result: &CategorizationResult,
    prediction: Option<&Prediction>,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Text:       {}\n", text));
    output.push_str(&format!("Category:   {}\n", result.category));
    output.push_str(&format!("Confidence: {:.1}%\n", result.confidence * 100.0));

    if result.is_fallback {
        output.push_str(&format!(
            "            (below the {:.0}% threshold, using {})\n",
            MIN_CONFIDENCE * 100.0,
            result.category
        ));
    }

    match prediction {
        Some(prediction) => {
            let mut ranked: Vec<_> = prediction.distribution.iter().collect();
            ranked.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));

            output.push_str(&format!(
                "\nDistribution (model v{}):\n",
                prediction.corpus_version
            ));
            for (category, probability) in ranked {
                let marker = if *category == prediction.top_category { "*" } else { " " };
                output.push_str(&format!(
                    "{} {:20} {:>6.1}%\n",
                    marker,
                    category.name(),
                    probability * 100.0
                ));
            }
        }
        None if result.is_fallback => {
            output.push_str("\nNo prediction was made for this text.\n");
        }
        None => {}
    }

    output
}

/// Format every example in the corpus
pub fn format_corpus_list(snapshot: &CorpusSnapshot) -> String {
    if snapshot.is_empty() {
        return "Training corpus is empty.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:4} {:40} {:20} {}\n",
        "#", "Text", "Label", "Source"
    ));
    output.push_str(&"-".repeat(78));
    output.push('\n');

    for (index, example) in snapshot.examples().iter().enumerate() {
        let source = match example.source {
            ExampleSource::Seed => "seed",
            ExampleSource::Correction => "correction",
        };
        output.push_str(&format!(
            "{:4} {:40} {:20} {}\n",
            index + 1,
            example.text,
            example.label.name(),
            source
        ));
    }

    output.push_str(&format!(
        "\n{} examples (corpus v{})\n",
        snapshot.len(),
        snapshot.version()
    ));

    output
}

/// Format corpus statistics
pub fn format_corpus_stats(stats: &CorpusStats) -> String {
    let mut output = String::new();

    output.push_str("Training Corpus\n");
    output.push_str(&"=".repeat(40));
    output.push('\n');
    output.push_str(&format!("Version:      {}\n", stats.version));
    output.push_str(&format!("Examples:     {}\n", stats.examples));
    output.push_str(&format!("Corrections:  {}\n", stats.corrections));

    match stats.model_version {
        Some(version) => {
            output.push_str(&format!("Model:        fitted on v{}\n", version));
            output.push_str(&format!("Vocabulary:   {} tokens\n", stats.vocabulary_size));
        }
        None => output.push_str("Model:        not fitted\n"),
    }
    if stats.is_stale() {
        output.push_str("              (corpus changed since last fit; run 'tally refit')\n");
    }

    output.push_str("\nExamples by category:\n");
    for (category, count) in &stats.by_category {
        output.push_str(&format!("  {:20} {:>4}\n", category.name(), count));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{CategorizationService, TrainingCorpus};
    use crate::models::Category;
    use std::sync::Arc;

    fn service() -> CategorizationService {
        CategorizationService::fitted(Arc::new(TrainingCorpus::with_default_seeds())).unwrap()
    }

    #[test]
    fn test_format_categorization_with_distribution() {
        let service = service();
        let result = service.categorize("pharmacy");
        let prediction = service.predict("pharmacy").unwrap();

        let output = format_categorization("pharmacy", &result, Some(&prediction));
        assert!(output.contains("Category:   Healthcare"));
        assert!(output.contains("Distribution (model v1)"));
        assert!(output.contains("* Healthcare"));
        // One line per category
        assert_eq!(output.matches('%').count(), 1 + Category::ALL.len());
    }

    #[test]
    fn test_format_fallback() {
        let service = service();
        let result = service.categorize("");

        let output = format_categorization("", &result, None);
        assert!(output.contains("Miscellaneous"));
        assert!(output.contains("below the 30% threshold"));
        assert!(output.contains("No prediction"));
    }

    #[test]
    fn test_format_corpus_list() {
        let corpus = TrainingCorpus::with_default_seeds();
        corpus.add_correction("hotel booking", Category::Travel).unwrap();
        let snapshot = corpus.snapshot().unwrap();

        let output = format_corpus_list(&snapshot);
        assert!(output.contains("hotel booking"));
        assert!(output.contains("correction"));
        assert!(output.contains(&format!("{} examples (corpus v2)", snapshot.len())));
    }

    #[test]
    fn test_format_corpus_stats() {
        let stats = CorpusStats {
            version: 3,
            examples: 30,
            corrections: 2,
            by_category: vec![(Category::Travel, 4)],
            model_version: Some(1),
            vocabulary_size: 52,
        };

        let output = format_corpus_stats(&stats);
        assert!(output.contains("Version:      3"));
        assert!(output.contains("fitted on v1"));
        assert!(output.contains("run 'tally refit'"));
        assert!(output.contains("Travel"));
    }
}
