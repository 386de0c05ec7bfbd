//! Reports module for Tally
//!
//! Pure aggregation over normalized records: the month category report, the
//! monthly trend, and the dashboard summary that combines them.

pub mod category;
pub mod summary;
pub mod trend;

pub use category::{BudgetStatus, CategoryReport, CategoryReportRow, UNCATEGORIZED_LABEL};
pub use summary::{
    available_months, expense_categories, records_for_month, summarize, DashboardSummary,
    MonthRecords, MonthlyTotals,
};
pub use trend::{TrendReport, TrendRow};
