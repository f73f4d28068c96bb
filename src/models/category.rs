//! Spending categories
//!
//! The category set is a closed enumeration. Every boundary that accepts a
//! category as text (corpus files, CLI arguments, CSV rows, budgets) parses it
//! through [`Category::from_str`], so a typo is rejected instead of creating an
//! orphan category.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::TallyError;

/// A spending category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    FoodDining,
    Transportation,
    Shopping,
    Entertainment,
    BillsUtilities,
    Healthcare,
    Education,
    Travel,
    PersonalCare,
    HomeGarden,
    /// Fallback for anything the classifier is unsure about
    Miscellaneous,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 11] = [
        Category::FoodDining,
        Category::Transportation,
        Category::Shopping,
        Category::Entertainment,
        Category::BillsUtilities,
        Category::Healthcare,
        Category::Education,
        Category::Travel,
        Category::PersonalCare,
        Category::HomeGarden,
        Category::Miscellaneous,
    ];

    /// The category used when classification is not confident enough
    pub const FALLBACK: Category = Category::Miscellaneous;

    /// Human-readable name, also the serialized form
    pub fn name(&self) -> &'static str {
        match self {
            Self::FoodDining => "Food & Dining",
            Self::Transportation => "Transportation",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::BillsUtilities => "Bills & Utilities",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Travel => "Travel",
            Self::PersonalCare => "Personal Care",
            Self::HomeGarden => "Home & Garden",
            Self::Miscellaneous => "Miscellaneous",
        }
    }

    /// Identifier form used in code and accepted on input (e.g. "FoodDining")
    pub fn ident(&self) -> &'static str {
        match self {
            Self::FoodDining => "FoodDining",
            Self::Transportation => "Transportation",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::BillsUtilities => "BillsUtilities",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Travel => "Travel",
            Self::PersonalCare => "PersonalCare",
            Self::HomeGarden => "HomeGarden",
            Self::Miscellaneous => "Miscellaneous",
        }
    }

    /// Whether this is the fallback category
    pub fn is_fallback(&self) -> bool {
        *self == Self::FALLBACK
    }
}

/// Reduce a label to lowercase alphanumerics so "Food & Dining",
/// "food-dining" and "FoodDining" compare equal
fn normalize(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

impl FromStr for Category {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        if key.is_empty() {
            return Err(TallyError::InvalidLabel(s.to_string()));
        }

        Self::ALL
            .iter()
            .copied()
            .find(|c| normalize(c.name()) == key || normalize(c.ident()) == key)
            .ok_or_else(|| TallyError::InvalidLabel(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_name() {
        assert_eq!("Food & Dining".parse::<Category>().unwrap(), Category::FoodDining);
        assert_eq!("Travel".parse::<Category>().unwrap(), Category::Travel);
    }

    #[test]
    fn test_parse_alternate_forms() {
        assert_eq!("FoodDining".parse::<Category>().unwrap(), Category::FoodDining);
        assert_eq!("food-dining".parse::<Category>().unwrap(), Category::FoodDining);
        assert_eq!("bills_utilities".parse::<Category>().unwrap(), Category::BillsUtilities);
        assert_eq!("  home & GARDEN ".parse::<Category>().unwrap(), Category::HomeGarden);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "Groceriez".parse::<Category>().unwrap_err();
        assert!(matches!(err, TallyError::InvalidLabel(label) if label == "Groceriez"));
        assert!("".parse::<Category>().is_err());
        assert!("&&".parse::<Category>().is_err());
    }

    #[test]
    fn test_all_contains_fallback() {
        assert!(Category::ALL.contains(&Category::FALLBACK));
        assert!(Category::Miscellaneous.is_fallback());
        assert!(!Category::Travel.is_fallback());
    }

    #[test]
    fn test_names_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.name().parse::<Category>().unwrap(), category);
            assert_eq!(category.ident().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&Category::BillsUtilities).unwrap();
        assert_eq!(json, "\"Bills & Utilities\"");

        let parsed: Category = serde_json::from_str("\"Personal Care\"").unwrap();
        assert_eq!(parsed, Category::PersonalCare);

        assert!(serde_json::from_str::<Category>("\"Pets\"").is_err());
    }
}
