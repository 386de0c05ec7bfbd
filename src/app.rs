//! Application composition root
//!
//! Built once per invocation from paths and settings. Owns the ledger
//! connection and hands out the services that borrow it.

use log::warn;

use crate::config::{Settings, TallyPaths};
use crate::error::TallyResult;
use crate::ledger::Ledger;
use crate::models::{BudgetRecord, ExpenseRecord, IncomeRecord, Month};
use crate::outcome::Outcome;
use crate::reports::available_months;
use crate::services::{
    normalize_budgets, normalize_expenses, normalize_income, CategorySuggester, EntryWriter,
    RecordLoader,
};
use crate::sheets::RawRow;

/// Normalized ledger contents plus the reasons any table could not be read
#[derive(Debug, Clone, Default)]
pub struct LedgerData {
    pub expenses: Vec<ExpenseRecord>,
    pub incomes: Vec<IncomeRecord>,
    pub budgets: Vec<BudgetRecord>,
    pub warnings: Vec<String>,
}

impl LedgerData {
    /// Latest month holding an expense or income, if any
    pub fn latest_month(&self) -> Option<Month> {
        available_months(&self.expenses, &self.incomes).pop()
    }
}

/// The application: settings plus the open ledger
pub struct App {
    paths: TallyPaths,
    settings: Settings,
    ledger: Ledger,
}

impl App {
    pub fn open(paths: TallyPaths, settings: Settings) -> TallyResult<Self> {
        let ledger = Ledger::open(&settings, &paths)?;
        Ok(Self {
            paths,
            settings,
            ledger,
        })
    }

    pub fn paths(&self) -> &TallyPaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn loader(&self) -> RecordLoader<'_> {
        RecordLoader::new(&self.ledger)
    }

    pub fn writer(&self) -> EntryWriter<'_> {
        EntryWriter::new(&self.ledger)
    }

    pub fn suggester(&self) -> TallyResult<CategorySuggester> {
        CategorySuggester::new(&self.settings.classifier)
    }

    /// Load and normalize all three tables
    ///
    /// A table that cannot be read contributes no records and one warning, so
    /// the rest of the dashboard still renders.
    pub fn load_data(&self) -> LedgerData {
        let loader = self.loader();
        let mut data = LedgerData::default();

        let expense_rows = degrade(loader.load_expenses(), "Expenses", &mut data.warnings);
        data.expenses = normalize_expenses(&expense_rows).records;

        let income_rows = degrade(loader.load_income(), "Income", &mut data.warnings);
        data.incomes = normalize_income(&income_rows).records;

        let budget_rows = degrade(loader.load_budgets(None), "Budgets", &mut data.warnings);
        data.budgets = normalize_budgets(&budget_rows).records;

        data
    }
}

fn degrade(outcome: Outcome<Vec<RawRow>>, table: &str, warnings: &mut Vec<String>) -> Vec<RawRow> {
    let (rows, reason) = outcome.into_parts();
    if let Some(reason) = reason {
        warn!("showing {} as empty: {}", table, reason);
        warnings.push(format!("{} could not be loaded: {}", table, reason));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_app() -> (TempDir, App) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let app = App::open(paths, Settings::default()).unwrap();
        (temp_dir, app)
    }

    #[test]
    fn test_uninitialized_ledger_degrades_to_warnings() {
        let (_temp_dir, app) = create_app();
        let data = app.load_data();

        assert!(data.expenses.is_empty());
        assert_eq!(data.warnings.len(), 3);
        assert!(data.warnings[0].starts_with("Expenses could not be loaded"));
        assert_eq!(data.latest_month(), None);
    }

    #[test]
    fn test_load_data_after_writes() {
        let (_temp_dir, app) = create_app();
        app.ledger().initialize().unwrap();

        let writer = app.writer();
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        assert!(writer
            .add_expense(date, Money::from_units(120), "Bus", "Transportation")
            .is_success());
        assert!(writer
            .add_income(date, Money::from_units(900), "Freelance", "")
            .is_success());

        let data = app.load_data();
        assert!(data.warnings.is_empty());
        assert_eq!(data.expenses.len(), 1);
        assert_eq!(data.incomes.len(), 1);
        assert_eq!(data.latest_month(), Month::new(2024, 3));
    }
}
