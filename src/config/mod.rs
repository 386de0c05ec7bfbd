//! Configuration module for Tally
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence (backend, table layouts, classifier endpoint)

pub mod paths;
pub mod settings;

pub use paths::TallyPaths;
pub use settings::{Backend, ClassifierSettings, Settings, TableLayout, Tables};
