//! Monthly Trend Report
//!
//! Expense and income totals per month across the whole ledger. Category
//! exclusions do not apply here.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::error::TallyResult;
use crate::models::{ExpenseRecord, IncomeRecord, Money, Month};

/// Totals for one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendRow {
    pub month: Month,
    pub expense: Money,
    pub income: Money,
}

impl TrendRow {
    pub fn net(&self) -> Money {
        self.income - self.expense
    }
}

/// Monthly Trend Report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendReport {
    /// Ascending by month
    pub rows: Vec<TrendRow>,
}

impl TrendReport {
    /// Outer join of monthly expense and income totals
    ///
    /// A month present on only one side gets zero on the other.
    pub fn generate(expenses: &[ExpenseRecord], incomes: &[IncomeRecord]) -> Self {
        let mut by_month: BTreeMap<Month, (Money, Money)> = BTreeMap::new();

        for expense in expenses {
            by_month.entry(expense.month()).or_default().0 += expense.amount;
        }
        for income in incomes {
            by_month.entry(income.month()).or_default().1 += income.amount;
        }

        let rows = by_month
            .into_iter()
            .map(|(month, (expense, income))| TrendRow {
                month,
                expense,
                income,
            })
            .collect();

        Self { rows }
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> TallyResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Month", "Expense", "Income"])?;

        for row in &self.rows {
            csv.write_record([
                row.month.to_string(),
                row.expense.to_plain_string(),
                row.income.to_plain_string(),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}
