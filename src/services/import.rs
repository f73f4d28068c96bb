//! CSV Import service
//!
//! Imports expenses from CSV files laid out as
//! `date,amount,description[,category][,payment_method]`. A header row is
//! optional; when present, columns are located by name. Rows without a
//! category are categorized by the classifier.

use std::collections::HashSet;
use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::error::TallyResult;
use crate::models::{Category, Money, NewTransaction, PaymentMethod, Transaction};
use crate::services::TransactionService;
use crate::storage::Storage;

/// Date formats accepted in imported files, tried in order
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%Y/%m/%d", "%m/%d/%y"];

/// Column positions in an import file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date_column: usize,
    pub amount_column: usize,
    pub description_column: usize,
    pub category_column: Option<usize>,
    pub payment_method_column: Option<usize>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date_column: 0,
            amount_column: 1,
            description_column: 2,
            category_column: Some(3),
            payment_method_column: Some(4),
        }
    }
}

impl ColumnMapping {
    /// Locate columns from a header row
    ///
    /// Returns `None` if the row has no recognizable date, amount and
    /// description headers.
    pub fn from_headers(headers: &StringRecord) -> Option<Self> {
        let mut date = None;
        let mut amount = None;
        let mut description = None;
        let mut category = None;
        let mut payment_method = None;

        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();
            if h.contains("date") {
                date.get_or_insert(idx);
            } else if h.contains("amount") {
                amount.get_or_insert(idx);
            } else if h.contains("description") || h.contains("merchant") || h.contains("memo") {
                description.get_or_insert(idx);
            } else if h.contains("category") {
                category.get_or_insert(idx);
            } else if h.contains("payment") || h.contains("method") {
                payment_method.get_or_insert(idx);
            }
        }

        Some(Self {
            date_column: date?,
            amount_column: amount?,
            description_column: description?,
            category_column: category,
            payment_method_column: payment_method,
        })
    }
}

/// A parsed row from the CSV before import
#[derive(Debug, Clone)]
pub struct ParsedRow {
    /// 1-based line number in the file
    pub line: usize,
    pub input: NewTransaction,
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    /// Imported rows whose category came from the classifier
    pub auto_categorized: usize,
    /// Rows matching an existing transaction's date, amount and description
    pub duplicates_skipped: usize,
    /// Line number and message for each row that could not be parsed
    pub errors: Vec<(usize, String)>,
}

/// Service for CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
    transactions: TransactionService<'a>,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage, transactions: TransactionService<'a>) -> Self {
        Self {
            storage,
            transactions,
        }
    }

    /// Parse a CSV into rows, keeping per-row errors
    pub fn parse_csv<R: Read>(
        &self,
        reader: R,
        default_payment_method: PaymentMethod,
    ) -> TallyResult<Vec<Result<ParsedRow, (usize, String)>>> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut mapping = ColumnMapping::default();
        let mut results = Vec::new();

        for (idx, record) in csv_reader.records().enumerate() {
            let line = idx + 1;
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    results.push(Err((line, format!("Error reading CSV record: {}", e))));
                    continue;
                }
            };

            if idx == 0 && !looks_like_data_row(&record) {
                mapping = ColumnMapping::from_headers(&record).unwrap_or_default();
                debug!(?mapping, "detected import columns");
                continue;
            }
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }

            results.push(
                parse_record(&record, &mapping, default_payment_method)
                    .map(|input| ParsedRow { line, input })
                    .map_err(|message| (line, message)),
            );
        }

        Ok(results)
    }

    /// Import parsed rows, skipping duplicates
    pub fn import(
        &self,
        rows: Vec<Result<ParsedRow, (usize, String)>>,
        auto_categorize: bool,
    ) -> TallyResult<ImportResult> {
        let mut seen: HashSet<(NaiveDate, Money, String)> = self
            .storage
            .transactions
            .get_all()?
            .iter()
            .map(duplicate_key)
            .collect();

        let mut result = ImportResult::default();
        let mut created = Vec::new();

        for row in rows {
            let row = match row {
                Ok(row) => row,
                Err(error) => {
                    warn!(line = error.0, error = %error.1, "skipping import row");
                    result.errors.push(error);
                    continue;
                }
            };

            let recorded = self.transactions.build(row.input, auto_categorize);
            if !seen.insert(duplicate_key(&recorded.transaction)) {
                result.duplicates_skipped += 1;
                continue;
            }

            if recorded.categorization.is_some() {
                result.auto_categorized += 1;
            }
            self.storage.transactions.upsert(recorded.transaction.clone())?;
            created.push(recorded.transaction);
        }

        if !created.is_empty() {
            self.storage.transactions.save()?;
            for txn in &created {
                self.transactions.log_created(txn)?;
            }
        }
        result.imported = created.len();

        Ok(result)
    }
}

fn duplicate_key(txn: &Transaction) -> (NaiveDate, Money, String) {
    (txn.date, txn.amount, txn.description.to_lowercase())
}

/// A first row whose first field parses as a date is data, not a header
fn looks_like_data_row(record: &StringRecord) -> bool {
    record
        .get(0)
        .map(|first| parse_date(first).is_ok())
        .unwrap_or(false)
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s.trim(), format).ok())
        .ok_or_else(|| format!("Could not parse date: '{}'", s))
}

fn parse_record(
    record: &StringRecord,
    mapping: &ColumnMapping,
    default_payment_method: PaymentMethod,
) -> Result<NewTransaction, String> {
    let field = |idx: usize, name: &str| {
        record
            .get(idx)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| format!("Missing {} column", name))
    };
    let optional = |idx: Option<usize>| idx.and_then(|i| record.get(i)).filter(|s| !s.is_empty());

    let date = parse_date(field(mapping.date_column, "date")?)?;

    let amount_str = field(mapping.amount_column, "amount")?;
    let amount = Money::parse(amount_str)
        .map_err(|e| format!("Could not parse amount '{}': {}", amount_str, e))?
        // Bank exports often list expenses as negative amounts
        .abs();

    let description = field(mapping.description_column, "description")?;

    let category = optional(mapping.category_column)
        .map(|s| s.parse::<Category>())
        .transpose()
        .map_err(|e| e.to_string())?;

    let payment_method = optional(mapping.payment_method_column)
        .map(|s| s.parse::<PaymentMethod>())
        .transpose()
        .map_err(|e| e.to_string())?
        .unwrap_or(default_payment_method);

    NewTransaction::new(date, amount, description, category, payment_method)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{CategorizationService, TrainingCorpus};
    use crate::config::TallyPaths;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn create_test_env() -> (TempDir, Storage, CategorizationService) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        let categorizer =
            CategorizationService::fitted(Arc::new(TrainingCorpus::with_default_seeds())).unwrap();
        (temp_dir, storage, categorizer)
    }

    #[test]
    fn test_header_detection() {
        let headers = StringRecord::from(vec!["Amount", "Transaction Date", "Merchant", "Category"]);
        let mapping = ColumnMapping::from_headers(&headers).unwrap();
        assert_eq!(mapping.date_column, 1);
        assert_eq!(mapping.amount_column, 0);
        assert_eq!(mapping.description_column, 2);
        assert_eq!(mapping.category_column, Some(3));
        assert_eq!(mapping.payment_method_column, None);

        let unrelated = StringRecord::from(vec!["foo", "bar"]);
        assert!(ColumnMapping::from_headers(&unrelated).is_none());
    }

    #[test]
    fn test_import_with_header_and_auto_categorization() {
        let (_temp_dir, storage, categorizer) = create_test_env();
        let service = ImportService::new(&storage, TransactionService::new(&storage, &categorizer));

        let csv = "date,amount,description,category,payment method\n\
                   2024-06-03,12.50,Team lunch,Food & Dining,Credit Card\n\
                   2024-06-04,-30.00,pharmacy,,\n\
                   06/05/2024,8,bus ticket,,Cash\n";
        let rows = service.parse_csv(csv.as_bytes(), PaymentMethod::Cash).unwrap();
        assert_eq!(rows.len(), 3);

        let result = service.import(rows, true).unwrap();
        assert_eq!(result.imported, 3);
        assert_eq!(result.auto_categorized, 2);
        assert!(result.errors.is_empty());

        let all = storage.transactions.get_all().unwrap();
        let pharmacy = all.iter().find(|t| t.description == "pharmacy").unwrap();
        assert_eq!(pharmacy.amount, Money::from_cents(3000));
        assert_eq!(pharmacy.category, Category::Healthcare);
        let lunch = all.iter().find(|t| t.description == "Team lunch").unwrap();
        assert_eq!(lunch.payment_method, PaymentMethod::CreditCard);
    }

    #[test]
    fn test_headerless_import_and_row_errors() {
        let (_temp_dir, storage, categorizer) = create_test_env();
        let service = ImportService::new(&storage, TransactionService::new(&storage, &categorizer));

        let csv = "2024-06-03,12.50,coffee shop\n\
                   not-a-date,1.00,broken\n\
                   2024-06-04,abc,broken amount\n\
                   2024-06-05,5.00,gift,Gifts\n";
        let rows = service.parse_csv(csv.as_bytes(), PaymentMethod::Cash).unwrap();
        let result = service.import(rows, true).unwrap();

        assert_eq!(result.imported, 1);
        let lines: Vec<usize> = result.errors.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![2, 3, 4]);
        assert!(result.errors[2].1.contains("Gifts"));
    }

    #[test]
    fn test_duplicates_skipped() {
        let (_temp_dir, storage, categorizer) = create_test_env();
        let service = ImportService::new(&storage, TransactionService::new(&storage, &categorizer));

        let csv = "2024-06-03,12.50,coffee shop\n2024-06-03,12.50,Coffee Shop\n";
        let rows = service.parse_csv(csv.as_bytes(), PaymentMethod::Cash).unwrap();
        let first = service.import(rows, true).unwrap();
        assert_eq!(first.imported, 1);
        assert_eq!(first.duplicates_skipped, 1);

        let rows = service.parse_csv(csv.as_bytes(), PaymentMethod::Cash).unwrap();
        let second = service.import(rows, true).unwrap();
        assert_eq!(second.imported, 0);
        assert_eq!(second.duplicates_skipped, 2);
    }
}
