//! Service layer for Tally
//!
//! Services sit between the sheet store and the command handlers: loading and
//! normalizing rows, writing validated entries, and asking the classification
//! service for category suggestions.

pub mod cache;
pub mod loader;
pub mod normalize;
pub mod suggest;
pub mod writer;

pub use cache::TtlCache;
pub use loader::RecordLoader;
pub use normalize::{normalize_budgets, normalize_expenses, normalize_income, Normalized};
pub use suggest::{matches_vocabulary, CategorySuggester, Suggestion};
pub use writer::{EntryWriter, WriteAction, WriteReceipt};
