//! Core data models for Tally
//!
//! This module contains the structures that represent the ledger domain:
//! money amounts, month buckets, and the expense/income/budget records.

pub mod category;
pub mod money;
pub mod month;
pub mod record;

pub use category::{is_known_category, merged_categories, DEFAULT_CATEGORIES};
pub use money::{Money, MoneyParseError};
pub use month::{Month, MonthParseError};
pub use record::{BudgetRecord, ExpenseRecord, IncomeRecord, SHEET_DATE_FORMAT};
