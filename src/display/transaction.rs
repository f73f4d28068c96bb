//! Transaction display formatting
//!
//! Provides utilities for formatting transactions for terminal display,
//! including register views and how each category was assigned.

use crate::models::{CategoryAssignment, Transaction};

/// Short label describing how a category was assigned
pub fn format_assignment(assignment: &CategoryAssignment) -> String {
    match assignment {
        CategoryAssignment::Manual => "manual".to_string(),
        CategoryAssignment::Classifier { confidence } => format!("auto {:.0}%", confidence * 100.0),
        CategoryAssignment::Fallback { confidence } => {
            format!("fallback {:.0}%", confidence * 100.0)
        }
    }
}

/// Format a single transaction for display (register row)
pub fn format_transaction_row(txn: &Transaction, currency_symbol: &str) -> String {
    format!(
        "{:12} {} {:28} {:>10} {:18} {:13} {}",
        txn.id.to_string(),
        txn.date.format("%Y-%m-%d"),
        truncate(&txn.description, 28),
        txn.amount.format_with_symbol(currency_symbol),
        truncate(txn.category.name(), 18),
        format_assignment(&txn.assignment),
        txn.payment_method
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(transactions: &[Transaction], currency_symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:10} {:28} {:>10} {:18} {:13} {}\n",
        "ID", "Date", "Description", "Amount", "Category", "Assigned", "Method"
    ));
    output.push_str(&"-".repeat(108));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, currency_symbol));
        output.push('\n');
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!("Description: {}\n", txn.description));
    output.push_str(&format!(
        "Category:    {} ({})\n",
        txn.category,
        format_assignment(&txn.assignment)
    ));
    output.push_str(&format!("Method:      {}\n", txn.payment_method));

    output
}

/// Pad or truncate a string to exactly `max_len` characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
