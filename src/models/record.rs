//! Typed ledger records
//!
//! These are the normalized forms of spreadsheet rows. Expense and income
//! records do not store a month; the bucket is computed from the date each
//! time it is asked for, so it can never drift from the date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::Money;
use super::month::Month;

/// Date format used when writing entries to the store
pub const SHEET_DATE_FORMAT: &str = "%d/%m/%Y";

/// A single expense entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub amount: Money,
    pub description: String,
    pub category: String,
}

impl ExpenseRecord {
    pub fn new(
        date: NaiveDate,
        amount: Money,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount,
            description: description.into(),
            category: category.into(),
        }
    }

    /// Month bucket derived from the date
    pub fn month(&self) -> Month {
        Month::from_date(self.date)
    }
}

/// A single income entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeRecord {
    pub date: NaiveDate,
    pub amount: Money,
    pub source: String,
    pub description: String,
}

impl IncomeRecord {
    pub fn new(
        date: NaiveDate,
        amount: Money,
        source: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount,
            source: source.into(),
            description: description.into(),
        }
    }

    pub fn month(&self) -> Month {
        Month::from_date(self.date)
    }
}

/// Budgeted amount for one category in one month
///
/// `row` is the 1-based spreadsheet row the record was loaded from; it is
/// `None` for records that have not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRecord {
    pub month: Month,
    pub category: String,
    pub budget_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl BudgetRecord {
    pub fn new(month: Month, category: impl Into<String>, budget_amount: Money) -> Self {
        Self {
            month,
            category: category.into(),
            budget_amount,
            row: None,
        }
    }

    /// Attach the sheet row this record was read from
    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Whether this record is the one for (month, category)
    pub fn matches(&self, month: Month, category: &str) -> bool {
        self.month == month && self.category == category
    }
}
