//! Tally - spreadsheet-backed expense and income tracker
//!
//! This library provides the core functionality for Tally. Expenses, income,
//! and monthly category budgets live in three tables of a spreadsheet (or in
//! local CSV files); Tally loads and normalizes those rows, joins them by
//! month and category, and reports totals and budget status.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `outcome`: Per-operation success/rejection/failure signal
//! - `models`: Money, months, and typed ledger records
//! - `sheets`: Tabular store abstraction with Sheets API and CSV backends
//! - `ledger`: The open store, table layouts, and budget cache
//! - `services`: Loading, normalizing, writing, and category suggestion
//! - `reports`: Aggregation into summaries, category reports, and trends
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//! - `app`: Composition root
//!
//! # Example
//!
//! ```rust,ignore
//! use tally_sheet::app::App;
//! use tally_sheet::config::{Settings, TallyPaths};
//!
//! let paths = TallyPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let app = App::open(paths, settings)?;
//! let data = app.load_data();
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod ledger;
pub mod models;
pub mod outcome;
pub mod reports;
pub mod services;
pub mod sheets;

pub use error::{TallyError, TallyResult};
pub use outcome::Outcome;
