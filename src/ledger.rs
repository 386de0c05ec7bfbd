//! Ledger connection
//!
//! The one connection object per process: the opened table store, the table
//! layouts, and the budget query cache. Services borrow it for the duration of
//! a call instead of reaching for global state.

use std::time::Duration;

use log::debug;

use crate::config::{Backend, Settings, Tables, TallyPaths};
use crate::error::{TallyError, TallyResult};
use crate::models::Month;
use crate::services::cache::TtlCache;
use crate::sheets::{CsvStore, RawRow, SheetStore, SheetsApiStore};
use crate::sheets::{BUDGET_HEADERS, EXPENSE_HEADERS, INCOME_HEADERS};

/// Open store plus everything services need to read and write the tables
pub struct Ledger {
    store: Box<dyn SheetStore>,
    tables: Tables,
    budget_cache: TtlCache<Option<Month>, Vec<RawRow>>,
}

impl Ledger {
    pub fn new(store: Box<dyn SheetStore>, tables: Tables, cache_ttl: Duration) -> Self {
        Self {
            store,
            tables,
            budget_cache: TtlCache::new(cache_ttl),
        }
    }

    /// Open the backend selected in settings
    pub fn open(settings: &Settings, paths: &TallyPaths) -> TallyResult<Self> {
        settings.validate()?;

        let store: Box<dyn SheetStore> = match settings.backend {
            Backend::Csv => {
                paths.ensure_directories()?;
                Box::new(CsvStore::new(paths.clone()))
            }
            Backend::Sheets => {
                let spreadsheet_id = settings.spreadsheet_id.clone().ok_or_else(|| {
                    TallyError::Config("spreadsheet_id is required for the sheets backend".into())
                })?;
                Box::new(SheetsApiStore::new(
                    &settings.sheets_api_base,
                    spreadsheet_id,
                    settings.sheets_token.clone(),
                )?)
            }
        };

        debug!("opened {:?} backend", settings.backend);

        Ok(Self::new(
            store,
            settings.tables.clone(),
            Duration::from_secs(settings.cache_ttl_secs),
        ))
    }

    pub fn store(&self) -> &dyn SheetStore {
        self.store.as_ref()
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn budget_cache(&self) -> &TtlCache<Option<Month>, Vec<RawRow>> {
        &self.budget_cache
    }

    /// Lay out all three tables, returning the names of the ones created
    pub fn initialize(&self) -> TallyResult<Vec<String>> {
        let mut created = Vec::new();
        for (layout, headers) in [
            (&self.tables.expenses, &EXPENSE_HEADERS[..]),
            (&self.tables.income, &INCOME_HEADERS[..]),
            (&self.tables.budgets, &BUDGET_HEADERS[..]),
        ] {
            if self.store.initialize_table(layout, headers)? {
                created.push(layout.name.clone());
            }
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_csv_backend_and_initialize() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let ledger = Ledger::open(&Settings::default(), &paths).unwrap();

        let created = ledger.initialize().unwrap();
        assert_eq!(created, vec!["Transactions", "Income", "Budgets"]);
        assert!(ledger.initialize().unwrap().is_empty());

        let grid = ledger.store().read_grid("Transactions").unwrap();
        assert_eq!(grid.len(), 4);
    }

    #[test]
    fn test_open_sheets_backend_requires_id() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings {
            backend: Backend::Sheets,
            ..Settings::default()
        };
        assert!(Ledger::open(&settings, &paths).is_err());
    }
}
