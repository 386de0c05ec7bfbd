//! Entry writer
//!
//! Validates new entries and writes them to the ledger tables. Expenses and
//! income are appended; budgets are upserted on (month, category).

use std::fmt;

use chrono::NaiveDate;
use log::{info, warn};

use crate::config::TableLayout;
use crate::error::{TallyError, TallyResult};
use crate::ledger::Ledger;
use crate::models::{Money, Month, SHEET_DATE_FORMAT};
use crate::outcome::Outcome;
use crate::services::normalize::normalize_budgets;
use crate::services::RecordLoader;
use crate::sheets::{
    header_columns, place_cells, BUDGET_HEADERS, EXPENSE_HEADERS, INCOME_HEADERS,
};

/// What a successful write did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Appended,
    Updated,
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteAction::Appended => write!(f, "appended"),
            WriteAction::Updated => write!(f, "updated"),
        }
    }
}

/// Where a successful write landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    pub table: String,
    pub action: WriteAction,
    /// Sheet row that was updated; appends don't learn their row
    pub row: Option<usize>,
    pub cells: Vec<String>,
}

/// Service for writing entries to the ledger
pub struct EntryWriter<'a> {
    ledger: &'a Ledger,
}

impl<'a> EntryWriter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Append an expense row
    pub fn add_expense(
        &self,
        date: NaiveDate,
        amount: Money,
        description: &str,
        category: &str,
    ) -> Outcome<WriteReceipt> {
        if let Err(e) = validate_entry(amount, category, "category") {
            return Outcome::from_error(e);
        }

        let cells = vec![
            date.format(SHEET_DATE_FORMAT).to_string(),
            amount.to_plain_string(),
            description.trim().to_string(),
            category.trim().to_string(),
        ];
        self.append(&self.ledger.tables().expenses, &EXPENSE_HEADERS, cells)
            .into()
    }

    /// Append an income row
    pub fn add_income(
        &self,
        date: NaiveDate,
        amount: Money,
        source: &str,
        description: &str,
    ) -> Outcome<WriteReceipt> {
        if let Err(e) = validate_entry(amount, source, "source") {
            return Outcome::from_error(e);
        }

        let cells = vec![
            date.format(SHEET_DATE_FORMAT).to_string(),
            amount.to_plain_string(),
            description.trim().to_string(),
            source.trim().to_string(),
        ];
        self.append(&self.ledger.tables().income, &INCOME_HEADERS, cells)
            .into()
    }

    /// Set the budget for a category in a month
    ///
    /// An existing (month, category) row has only its amount cell updated;
    /// otherwise a new row is appended. The lookup goes through the budget
    /// cache, so a row appended within the cache window is not seen and a
    /// second upsert for the same key in that window appends again.
    pub fn upsert_budget(&self, month: Month, category: &str, amount: Money) -> Outcome<WriteReceipt> {
        let category = category.trim();
        if category.is_empty() {
            return Outcome::rejected("Budget category cannot be empty");
        }
        if amount.is_negative() {
            return Outcome::rejected("Budget amount cannot be negative");
        }

        let rows = match RecordLoader::new(self.ledger).load_budgets(None) {
            Outcome::Success(rows) => rows,
            other => {
                let reason = other.reason().unwrap_or("budget load failed").to_string();
                return Outcome::failed(format!("Could not look up existing budgets: {}", reason));
            }
        };

        let existing = normalize_budgets(&rows)
            .records
            .into_iter()
            .find(|record| record.matches(month, category))
            .and_then(|record| record.row);

        let layout = &self.ledger.tables().budgets;
        let result = match existing {
            Some(row) => self.update_amount(layout, row, amount),
            None => {
                let cells = vec![
                    month.to_string(),
                    category.to_string(),
                    amount.to_plain_string(),
                ];
                self.append(layout, &BUDGET_HEADERS, cells)
            }
        };
        result.into()
    }

    /// Upsert every positive entry of a budget-editing grid
    ///
    /// Entries with a zero amount are skipped. A category listed twice keeps
    /// its last amount. Outcomes are reported per category in input order.
    pub fn upsert_budgets(
        &self,
        month: Month,
        entries: &[(String, Money)],
    ) -> Vec<(String, Outcome<WriteReceipt>)> {
        let mut latest: Vec<(String, Money)> = Vec::new();
        for (category, amount) in entries {
            let category = category.trim().to_string();
            match latest.iter_mut().find(|(c, _)| *c == category) {
                Some(slot) => slot.1 = *amount,
                None => latest.push((category, *amount)),
            }
        }

        latest
            .into_iter()
            .filter(|(_, amount)| amount.is_positive())
            .map(|(category, amount)| {
                let outcome = self.upsert_budget(month, &category, amount);
                (category, outcome)
            })
            .collect()
    }

    /// 0-based columns of `headers` in the table as it is laid out now
    fn locate(&self, layout: &TableLayout, headers: &[&str]) -> TallyResult<Vec<usize>> {
        let grid = self.ledger.store().read_grid(&layout.name)?;
        header_columns(&grid, layout, headers)
    }

    /// Append values given in `headers` order, placed under their headers
    fn append(
        &self,
        layout: &TableLayout,
        headers: &[&str],
        cells: Vec<String>,
    ) -> TallyResult<WriteReceipt> {
        let table = &layout.name;
        let written = self
            .locate(layout, headers)
            .map(|columns| place_cells(&columns, &cells))
            .and_then(|row| self.ledger.store().append_row(table, &row));

        match written {
            Ok(()) => {
                info!("appended row to '{}'", table);
                Ok(WriteReceipt {
                    table: table.clone(),
                    action: WriteAction::Appended,
                    row: None,
                    cells,
                })
            }
            Err(e) => {
                warn!("append to '{}' failed: {}", table, e);
                Err(e)
            }
        }
    }

    fn update_amount(&self, layout: &TableLayout, row: usize, amount: Money) -> TallyResult<WriteReceipt> {
        let table = &layout.name;
        let value = amount.to_plain_string();
        let written = self
            .locate(layout, &["BudgetAmount"])
            .and_then(|columns| {
                let column = columns[0] + 1;
                self.ledger.store().update_cell(table, row, column, &value)
            });

        match written {
            Ok(()) => {
                info!("updated budget amount on row {} of '{}'", row, table);
                Ok(WriteReceipt {
                    table: table.clone(),
                    action: WriteAction::Updated,
                    row: Some(row),
                    cells: vec![value],
                })
            }
            Err(e) => {
                warn!("update of row {} in '{}' failed: {}", row, table, e);
                Err(e)
            }
        }
    }
}

fn validate_entry(amount: Money, label: &str, label_name: &str) -> TallyResult<()> {
    if !amount.is_positive() {
        return Err(TallyError::Validation(
            "Amount must be greater than zero".into(),
        ));
    }
    if label.trim().is_empty() {
        return Err(TallyError::Validation(format!(
            "Please enter a {}",
            label_name
        )));
    }
    Ok(())
}
