//! User settings for Tally
//!
//! Manages which backend holds the ledger tables, where each table's header
//! row sits, the classification service endpoint, and display preferences.

use serde::{Deserialize, Serialize};

use super::paths::TallyPaths;
use crate::error::TallyError;

/// Where the ledger tables live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// CSV files under the data directory (default)
    #[default]
    Csv,
    /// A Google spreadsheet reached through the Sheets REST API
    Sheets,
}

/// Name of a table and the 1-based row its header sits on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    pub name: String,
    pub header_row: usize,
}

impl TableLayout {
    pub fn new(name: impl Into<String>, header_row: usize) -> Self {
        Self {
            name: name.into(),
            header_row,
        }
    }
}

/// Layouts of the three ledger tables
///
/// The Expenses header sits on row 4 while Income and Budgets use row 1.
/// The asymmetry mirrors the existing spreadsheet and is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default = "default_expenses_table")]
    pub expenses: TableLayout,
    #[serde(default = "default_income_table")]
    pub income: TableLayout,
    #[serde(default = "default_budgets_table")]
    pub budgets: TableLayout,
}

fn default_expenses_table() -> TableLayout {
    TableLayout::new("Transactions", 4)
}

fn default_income_table() -> TableLayout {
    TableLayout::new("Income", 1)
}

fn default_budgets_table() -> TableLayout {
    TableLayout::new("Budgets", 1)
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            expenses: default_expenses_table(),
            income: default_income_table(),
            budgets: default_budgets_table(),
        }
    }
}

/// Classification service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_classifier_url")]
    pub base_url: String,
    #[serde(default = "default_classifier_model")]
    pub model: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_classifier_timeout")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_classifier_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_classifier_model() -> String {
    "llama3".to_string()
}

fn default_classifier_timeout() -> u64 {
    30
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_classifier_url(),
            model: default_classifier_model(),
            timeout_secs: default_classifier_timeout(),
        }
    }
}

/// User settings for Tally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub backend: Backend,

    /// Spreadsheet key, required by the sheets backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,

    #[serde(default = "default_sheets_api_base")]
    pub sheets_api_base: String,

    /// OAuth access token for the Sheets API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheets_token: Option<String>,

    #[serde(default)]
    pub tables: Tables,

    #[serde(default)]
    pub classifier: ClassifierSettings,

    /// How long a budget table load is reused, in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Categories left out of dashboard totals unless overridden
    #[serde(default = "default_excluded_categories")]
    pub default_excluded_categories: Vec<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_sheets_api_base() -> String {
    "https://sheets.googleapis.com/v4".to_string()
}

fn default_cache_ttl() -> u64 {
    60
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_excluded_categories() -> Vec<String> {
    vec!["Farmhouse".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backend: Backend::default(),
            spreadsheet_id: None,
            sheets_api_base: default_sheets_api_base(),
            sheets_token: None,
            tables: Tables::default(),
            classifier: ClassifierSettings::default(),
            cache_ttl_secs: default_cache_ttl(),
            currency_symbol: default_currency(),
            default_excluded_categories: default_excluded_categories(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    ///
    /// Environment overrides (`TALLY_SHEETS_TOKEN`, `TALLY_CLASSIFIER_URL`)
    /// are applied on top of whatever was loaded.
    pub fn load_or_create(paths: &TallyPaths) -> Result<Self, TallyError> {
        let settings_path = paths.settings_file();

        let mut settings = if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| TallyError::Io(format!("Failed to read settings file: {}", e)))?;

            serde_json::from_str(&contents)
                .map_err(|e| TallyError::Config(format!("Failed to parse settings file: {}", e)))?
        } else {
            // Don't save yet - let caller decide when to persist
            Settings::default()
        };

        settings.apply_env_overrides();
        Ok(settings)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("TALLY_SHEETS_TOKEN") {
            if !token.trim().is_empty() {
                self.sheets_token = Some(token.trim().to_string());
            }
        }
        if let Ok(url) = std::env::var("TALLY_CLASSIFIER_URL") {
            if !url.trim().is_empty() {
                self.classifier.base_url = url.trim().to_string();
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TallyPaths) -> Result<(), TallyError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TallyError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TallyError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Check that the selected backend has what it needs
    pub fn validate(&self) -> Result<(), TallyError> {
        if self.backend == Backend::Sheets
            && self
                .spreadsheet_id
                .as_deref()
                .map_or(true, |id| id.trim().is_empty())
        {
            return Err(TallyError::Config(
                "backend is 'sheets' but no spreadsheet_id is configured".into(),
            ));
        }

        for layout in [&self.tables.expenses, &self.tables.income, &self.tables.budgets] {
            if layout.header_row == 0 {
                return Err(TallyError::Config(format!(
                    "table '{}' has header_row 0; rows are numbered from 1",
                    layout.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.backend, Backend::Csv);
        assert_eq!(settings.tables.expenses.header_row, 4);
        assert_eq!(settings.tables.income.header_row, 1);
        assert_eq!(settings.tables.budgets.header_row, 1);
        assert_eq!(settings.cache_ttl_secs, 60);
        assert_eq!(settings.default_excluded_categories, vec!["Farmhouse"]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.backend = Backend::Sheets;
        settings.spreadsheet_id = Some("sheet-key".into());
        settings.cache_ttl_secs = 5;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.backend, Backend::Sheets);
        assert_eq!(loaded.spreadsheet_id.as_deref(), Some("sheet-key"));
        assert_eq!(loaded.cache_ttl_secs, 5);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"tables": {"expenses": {"name": "Spend", "header_row": 2}}}"#)
            .unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.tables.expenses, TableLayout::new("Spend", 2));
        assert_eq!(loaded.tables.income, TableLayout::new("Income", 1));
        assert_eq!(loaded.classifier.model, "llama3");
    }

    #[test]
    fn test_sheets_backend_requires_spreadsheet_id() {
        let settings = Settings {
            backend: Backend::Sheets,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(TallyError::Config(_))));
    }

    #[test]
    fn test_zero_header_row_rejected() {
        let mut settings = Settings::default();
        settings.tables.budgets.header_row = 0;
        assert!(settings.validate().is_err());
    }
}
