//! Built-in seed examples
//!
//! A small labeled set that lets a fresh installation categorize common
//! expenses before the user has corrected anything.

use crate::models::{Category, LabeledText};

const DEFAULT_SEEDS: &[(&str, Category)] = &[
    ("pizza delivery", Category::FoodDining),
    ("grocery store", Category::FoodDining),
    ("restaurant bill", Category::FoodDining),
    ("coffee shop", Category::FoodDining),
    ("gas station", Category::Transportation),
    ("uber ride", Category::Transportation),
    ("bus ticket", Category::Transportation),
    ("car maintenance", Category::Transportation),
    ("amazon purchase", Category::Shopping),
    ("clothing store", Category::Shopping),
    ("electronics", Category::Shopping),
    ("movie tickets", Category::Entertainment),
    ("concert", Category::Entertainment),
    ("streaming service", Category::Entertainment),
    ("electricity bill", Category::BillsUtilities),
    ("phone bill", Category::BillsUtilities),
    ("internet", Category::BillsUtilities),
    ("doctor visit", Category::Healthcare),
    ("pharmacy", Category::Healthcare),
    ("dental", Category::Healthcare),
    ("tuition", Category::Education),
    ("books", Category::Education),
    ("hotel", Category::Travel),
    ("flight", Category::Travel),
    ("haircut", Category::PersonalCare),
    ("cosmetics", Category::PersonalCare),
    ("home depot", Category::HomeGarden),
    ("garden supplies", Category::HomeGarden),
];

/// The built-in seed examples as portable records
pub fn default_seed_examples() -> Vec<LabeledText> {
    DEFAULT_SEEDS
        .iter()
        .map(|(text, label)| LabeledText::new(*text, *label))
        .collect()
}
