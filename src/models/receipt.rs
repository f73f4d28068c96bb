//! Receipt drafts
//!
//! Text extracted from a receipt image arrives as a best-effort triple of
//! strings. It is untrusted: every field is re-validated here before the
//! draft becomes a [`NewTransaction`] and is offered to the categorizer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::Money;
use super::transaction::{NewTransaction, PaymentMethod};
use crate::error::TallyError;

/// Date layouts seen on receipts, tried in order
const RECEIPT_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%Y/%m/%d"];

/// An unvalidated `{amount, date, description}` triple from text extraction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptDraft {
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ReceiptDraft {
    /// Validate the draft into a transaction input
    ///
    /// A missing date falls back to `today`; a missing amount or description
    /// is an error since neither can be guessed.
    pub fn validate(
        &self,
        today: NaiveDate,
        payment_method: PaymentMethod,
    ) -> Result<NewTransaction, TallyError> {
        let amount = self
            .amount
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| TallyError::Validation("Receipt has no amount".into()))?;
        let amount = Money::parse(amount)
            .map_err(|e| TallyError::Validation(format!("Receipt amount: {}", e)))?;

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => today,
            Some(raw) => parse_receipt_date(raw)
                .ok_or_else(|| TallyError::Validation(format!("Receipt date: {}", raw)))?,
        };

        let description = self
            .description
            .as_deref()
            .map(|d| d.split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_default();

        NewTransaction::new(date, amount, description, None, payment_method)
    }
}

fn parse_receipt_date(raw: &str) -> Option<NaiveDate> {
    RECEIPT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn draft(amount: Option<&str>, date: Option<&str>, description: Option<&str>) -> ReceiptDraft {
        ReceiptDraft {
            amount: amount.map(String::from),
            date: date.map(String::from),
            description: description.map(String::from),
        }
    }

    #[test]
    fn test_valid_draft() {
        let input = draft(Some("$25.99"), Some("06/02/2024"), Some("Coffee   Shop\nlatte"))
            .validate(today(), PaymentMethod::Cash)
            .unwrap();
        assert_eq!(input.amount.cents(), 2599);
        assert_eq!(input.date, NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        assert_eq!(input.description, "Coffee Shop latte");
        assert_eq!(input.category, None);
    }

    #[test]
    fn test_missing_date_uses_today() {
        let input = draft(Some("10"), None, Some("pharmacy"))
            .validate(today(), PaymentMethod::DebitCard)
            .unwrap();
        assert_eq!(input.date, today());
        assert_eq!(input.payment_method, PaymentMethod::DebitCard);
    }

    #[test]
    fn test_rejects_untrusted_garbage() {
        assert!(draft(None, None, Some("coffee")).validate(today(), PaymentMethod::Cash).is_err());
        assert!(draft(Some("12,3x"), None, Some("coffee"))
            .validate(today(), PaymentMethod::Cash)
            .is_err());
        assert!(draft(Some("12.00"), Some("yesterday"), Some("coffee"))
            .validate(today(), PaymentMethod::Cash)
            .is_err());
        assert!(draft(Some("12.00"), None, None).validate(today(), PaymentMethod::Cash).is_err());
        assert!(draft(Some("-4.00"), None, Some("coffee"))
            .validate(today(), PaymentMethod::Cash)
            .is_err());
    }
}
