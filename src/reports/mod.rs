//! Reports module for Tally
//!
//! Budget variance for a month and spending analysis over a date range.

pub mod spending;
pub mod variance;

pub use spending::{DailySpending, SpendingByCategory, SpendingReport};
pub use variance::{compute_variance, VarianceRecord, VarianceReport, VarianceStatus};
