//! YAML corpus export and import
//!
//! Same records as the JSON form, for users who edit their corpus by hand.

use std::io::Write;

use super::json::{into_labeled, RawRecord};
use crate::classifier::CorpusSnapshot;
use crate::error::{TallyError, TallyResult};
use crate::models::LabeledText;

/// Export a corpus snapshot to YAML
pub fn export_corpus_yaml<W: Write>(snapshot: &CorpusSnapshot, writer: &mut W) -> TallyResult<()> {
    writeln!(writer, "# Tally training corpus ({} examples)", snapshot.len())
        .map_err(|e| TallyError::Export(e.to_string()))?;
    writeln!(writer, "# Each entry pairs a description with its category.")
        .map_err(|e| TallyError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, snapshot).map_err(|e| TallyError::Export(e.to_string()))?;
    Ok(())
}

/// Parse labeled records from a YAML export
pub fn import_corpus_yaml(yaml_str: &str) -> TallyResult<Vec<LabeledText>> {
    let records: Vec<RawRecord> =
        serde_yaml::from_str(yaml_str).map_err(|e| TallyError::Import(e.to_string()))?;
    into_labeled(records)
}
