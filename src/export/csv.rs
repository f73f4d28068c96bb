//! CSV Export functionality
//!
//! Writes transactions in the column layout the CSV importer reads, so an
//! export can be imported again.

use std::io::Write;

use crate::error::{TallyError, TallyResult};
use crate::models::Transaction;

/// Column headers for transaction exports
pub const TRANSACTION_HEADERS: [&str; 6] = [
    "Date",
    "Amount",
    "Description",
    "Category",
    "Payment Method",
    "ID",
];

/// Export transactions to CSV
pub fn export_transactions_csv<W: Write>(transactions: &[Transaction], writer: W) -> TallyResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(TRANSACTION_HEADERS)
        .map_err(|e| TallyError::Export(e.to_string()))?;

    for txn in transactions {
        csv_writer
            .write_record([
                txn.date.to_string(),
                format!("{:.2}", txn.amount.as_f64()),
                txn.description.clone(),
                txn.category.name().to_string(),
                txn.payment_method.to_string(),
                txn.id.as_uuid().to_string(),
            ])
            .map_err(|e| TallyError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| TallyError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryAssignment, Money, NewTransaction, PaymentMethod};
    use chrono::NaiveDate;

    #[test]
    fn test_export_quotes_descriptions() {
        let input = NewTransaction::new(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            Money::from_cents(123456),
            "Dinner, drinks",
            None,
            PaymentMethod::DigitalWallet,
        )
        .unwrap();
        let txn = Transaction::new(input, Category::FoodDining, CategoryAssignment::Manual);

        let mut output = Vec::new();
        export_transactions_csv(&[txn.clone()], &mut output).unwrap();
        let csv = String::from_utf8(output).unwrap();

        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Date,Amount,Description,Category,Payment Method,ID")
        );
        assert_eq!(
            lines.next().unwrap(),
            format!(
                "2025-01-15,1234.56,\"Dinner, drinks\",Food & Dining,Digital Wallet,{}",
                txn.id.as_uuid()
            )
        );
    }
}
