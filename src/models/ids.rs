//! Transaction identifiers
//!
//! A newtype over UUID so transaction IDs cannot be confused with other
//! strings. Displayed in a short `txn-xxxxxxxx` form; the repository resolves
//! short forms back to full IDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Prefix used when displaying transaction IDs
pub const TRANSACTION_ID_PREFIX: &str = "txn-";

/// Unique identifier of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Whether the user-typed `fragment` identifies this ID
    ///
    /// Accepts the full UUID, the short display form, or any hex prefix of at
    /// least four characters, with or without the `txn-` prefix.
    pub fn matches(&self, fragment: &str) -> bool {
        let fragment = fragment.trim();
        let fragment = fragment
            .strip_prefix(TRANSACTION_ID_PREFIX)
            .unwrap_or(fragment)
            .to_ascii_lowercase();
        fragment.len() >= 4 && self.0.to_string().starts_with(&fragment)
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", TRANSACTION_ID_PREFIX, &self.0.to_string()[..8])
    }
}

impl FromStr for TransactionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix(TRANSACTION_ID_PREFIX).unwrap_or(s);
        Ok(Self(Uuid::parse_str(s)?))
    }
}
