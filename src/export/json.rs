//! JSON corpus export and import
//!
//! The corpus is exchanged as a plain list of `{text, label}` records, with
//! labels written as category display names.

use std::io::Write;

use serde::Deserialize;

use crate::classifier::CorpusSnapshot;
use crate::error::{TallyError, TallyResult};
use crate::models::{Category, LabeledText};

/// A record as read from a file, before its label is checked
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawRecord {
    text: String,
    label: String,
}

impl RawRecord {
    pub(crate) fn into_labeled(self) -> TallyResult<LabeledText> {
        let label: Category = self.label.parse()?;
        Ok(LabeledText::new(self.text, label))
    }
}

/// Convert raw records, failing on the first unknown label
pub(crate) fn into_labeled(records: Vec<RawRecord>) -> TallyResult<Vec<LabeledText>> {
    records.into_iter().map(RawRecord::into_labeled).collect()
}

/// Export a corpus snapshot to JSON
pub fn export_corpus_json<W: Write>(snapshot: &CorpusSnapshot, writer: &mut W) -> TallyResult<()> {
    serde_json::to_writer_pretty(&mut *writer, snapshot)
        .map_err(|e| TallyError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| TallyError::Export(e.to_string()))?;
    Ok(())
}

/// Parse labeled records from a JSON export
pub fn import_corpus_json(json_str: &str) -> TallyResult<Vec<LabeledText>> {
    let records: Vec<RawRecord> =
        serde_json::from_str(json_str).map_err(|e| TallyError::Import(e.to_string()))?;
    into_labeled(records)
}
