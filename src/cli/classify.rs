//! Classifier CLI commands
//!
//! Categorize free text, record corrections, refit the model, and maintain
//! the training corpus (list, backup, restore, purge).

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};

use crate::classifier::{tokenize, CategorizationService};
use crate::display::{format_categorization, format_corpus_list, format_corpus_stats};
use crate::error::{TallyError, TallyResult};
use crate::export::{export_corpus_json, export_corpus_yaml, import_corpus_json, import_corpus_yaml};
use crate::models::Category;
use crate::services::{CorpusService, ImportOutcome};
use crate::storage::Storage;

use super::{finish_output, open_output};

/// Corpus backup format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CorpusFormat {
    /// JSON list of `{text, label}` records
    Json,
    /// YAML list of `{text, label}` records
    Yaml,
}

impl CorpusFormat {
    /// Guess the format from a file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Training corpus subcommands
#[derive(Subcommand, Debug)]
pub enum CorpusCommands {
    /// List every training example
    List,

    /// Export the corpus as a backup
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: CorpusFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import examples from a JSON or YAML backup
    ///
    /// Restores the backup over an untouched seed corpus; appends to a
    /// corpus that already has imports or corrections unless --replace.
    Import {
        /// Path to the backup file
        file: PathBuf,

        /// Input format (guessed from the extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<CorpusFormat>,

        /// Replace the whole corpus with the backup
        #[arg(long)]
        replace: bool,
    },

    /// Remove every user correction from the corpus
    PurgeCorrections,

    /// Show corpus and model statistics
    Stats,
}

/// Categorize a description and print the answer
pub fn handle_categorize(
    categorizer: &CategorizationService,
    text: &str,
    explain: bool,
) -> TallyResult<()> {
    let result = categorizer.categorize(text);

    let prediction = if explain && !tokenize(text).is_empty() {
        categorizer.predict(text)
    } else {
        None
    };

    if explain {
        print!("{}", format_categorization(text, &result, prediction.as_ref()));
    } else {
        println!("{} ({:.1}%)", result.category, result.confidence * 100.0);
    }

    Ok(())
}

/// Record the right category for a description
pub fn handle_correct(
    storage: &Storage,
    categorizer: &CategorizationService,
    text: &str,
    category: &str,
) -> TallyResult<()> {
    let category: Category = category.parse()?;
    let example = CorpusService::new(storage, categorizer).record_correction(text, category)?;

    println!("Recorded correction: '{}' -> {}", example.text, example.label);
    println!("Run 'tally refit' to apply it to the model.");

    Ok(())
}

/// Fit a new model from the current corpus
pub fn handle_refit(storage: &Storage, categorizer: &CategorizationService) -> TallyResult<()> {
    let model = CorpusService::new(storage, categorizer).refit()?;

    println!("Model refitted on corpus v{}", model.corpus_version());
    println!("  Examples:   {}", model.total_examples());
    println!("  Vocabulary: {} tokens", model.vocabulary().len());

    Ok(())
}

/// Handle a corpus command
pub fn handle_corpus_command(
    storage: &Storage,
    categorizer: &CategorizationService,
    cmd: CorpusCommands,
) -> TallyResult<()> {
    let service = CorpusService::new(storage, categorizer);

    match cmd {
        CorpusCommands::List => {
            let snapshot = service.snapshot()?;
            print!("{}", format_corpus_list(&snapshot));
        }

        CorpusCommands::Export { format, output } => {
            let snapshot = service.snapshot()?;
            let mut writer = open_output(output.as_deref())?;

            match format {
                CorpusFormat::Json => export_corpus_json(&snapshot, &mut writer)?,
                CorpusFormat::Yaml => export_corpus_yaml(&snapshot, &mut writer)?,
            }
            finish_output(writer)?;

            if let Some(path) = output {
                println!("Exported {} examples to: {}", snapshot.len(), path.display());
            }
        }

        CorpusCommands::Import {
            file,
            format,
            replace,
        } => {
            let contents = fs::read_to_string(&file).map_err(|e| {
                TallyError::Import(format!("Failed to read {}: {}", file.display(), e))
            })?;

            let records = match format.unwrap_or_else(|| CorpusFormat::from_path(&file)) {
                CorpusFormat::Json => import_corpus_json(&contents)?,
                CorpusFormat::Yaml => import_corpus_yaml(&contents)?,
            };

            let changed = match service.import_backup(records, replace)? {
                ImportOutcome::Appended(added) => {
                    println!("Imported {} examples from {}", added, file.display());
                    added > 0
                }
                ImportOutcome::Restored(count) => {
                    println!("Restored {} examples from {}", count, file.display());
                    true
                }
            };
            if changed {
                println!("Run 'tally refit' to apply them to the model.");
            }
        }

        CorpusCommands::PurgeCorrections => {
            let removed = service.purge_corrections()?;
            if removed == 0 {
                println!("No corrections to remove.");
            } else {
                println!("Removed {} corrections.", removed);
                println!("Run 'tally refit' to apply the change to the model.");
            }
        }

        CorpusCommands::Stats => {
            let stats = service.stats()?;
            print!("{}", format_corpus_stats(&stats));
        }
    }

    Ok(())
}
