//! Display formatting for terminal output
//!
//! Provides utilities for formatting reports and records for terminal
//! display, including tables and text bar charts.

pub mod dashboard;
pub mod report;

pub use dashboard::{
    format_budget_list, format_category_table, format_records, format_share_chart,
    format_summary, format_trend_table,
};
