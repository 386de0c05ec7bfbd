//! Record loader
//!
//! Reads the three ledger tables and hands back header-keyed rows. Every load
//! reports an [`Outcome`] so an unreachable store is never mistaken for an
//! empty ledger.

use log::{debug, warn};

use crate::config::TableLayout;
use crate::error::TallyResult;
use crate::ledger::Ledger;
use crate::models::Month;
use crate::outcome::Outcome;
use crate::services::normalize::parse_month;
use crate::sheets::{rows_from_grid, RawRow, BUDGET_HEADERS, EXPENSE_HEADERS, INCOME_HEADERS};

/// Service that loads raw rows from the ledger tables
pub struct RecordLoader<'a> {
    ledger: &'a Ledger,
}

impl<'a> RecordLoader<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Load every expense row
    pub fn load_expenses(&self) -> Outcome<Vec<RawRow>> {
        let layout = &self.ledger.tables().expenses;
        self.load_table(layout, &EXPENSE_HEADERS).into()
    }

    /// Load every income row
    pub fn load_income(&self) -> Outcome<Vec<RawRow>> {
        let layout = &self.ledger.tables().income;
        self.load_table(layout, &INCOME_HEADERS).into()
    }

    /// Load budget rows, optionally only those of one month
    ///
    /// Results are cached per query for the configured window. Writes do not
    /// invalidate the cache.
    pub fn load_budgets(&self, month: Option<Month>) -> Outcome<Vec<RawRow>> {
        self.ledger
            .budget_cache()
            .get_or_try_insert_with(month, || -> TallyResult<Vec<RawRow>> {
                let layout = &self.ledger.tables().budgets;
                let rows = self.load_table(layout, &BUDGET_HEADERS)?;
                Ok(match month {
                    Some(month) => rows
                        .into_iter()
                        .filter(|row| parse_month(row.get("Month")) == Some(month))
                        .collect(),
                    None => rows,
                })
            })
            .into()
    }

    fn load_table(&self, layout: &TableLayout, headers: &[&str]) -> TallyResult<Vec<RawRow>> {
        let result = self
            .ledger
            .store()
            .read_grid(&layout.name)
            .and_then(|grid| rows_from_grid(&grid, layout, headers));

        match &result {
            Ok(rows) => debug!("loaded {} rows from '{}'", rows.len(), layout.name),
            Err(e) => warn!("could not load table '{}': {}", layout.name, e),
        }
        result
    }
}
