//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod entry;
pub mod report;
pub mod suggest;

pub use budget::{handle_budget_command, BudgetCommands};
pub use entry::{handle_expense_command, handle_income_command, ExpenseCommands, IncomeCommands};
pub use report::{handle_report_command, ReportCommands};
pub use suggest::handle_suggest_command;

use chrono::{Local, NaiveDate};

use crate::error::{TallyError, TallyResult};
use crate::models::{Money, Month};
use crate::outcome::Outcome;
use crate::services::normalize::parse_date;
use crate::services::WriteReceipt;

/// Parse an amount argument such as "1500", "1,500.50", or "₹250"
pub(crate) fn parse_amount_arg(raw: &str) -> TallyResult<Money> {
    Money::parse(raw).map_err(|e| TallyError::Validation(e.to_string()))
}

/// Parse a month argument ("YYYY-MM"), defaulting to the current month
pub(crate) fn parse_month_arg(raw: Option<&str>) -> TallyResult<Month> {
    match raw {
        Some(s) => Month::parse(s.trim()).map_err(|e| TallyError::Validation(e.to_string())),
        None => Ok(Month::current()),
    }
}

/// Parse a date argument (day-first or ISO), defaulting to today
pub(crate) fn parse_date_arg(raw: Option<&str>) -> TallyResult<NaiveDate> {
    match raw {
        Some(s) => parse_date(s)
            .ok_or_else(|| TallyError::Validation(format!("Invalid date: '{}'", s))),
        None => Ok(Local::now().date_naive()),
    }
}

/// Print a successful write, or turn a rejection or failure into an error
pub(crate) fn finish_write(outcome: Outcome<WriteReceipt>, what: &str) -> TallyResult<()> {
    match outcome {
        Outcome::Success(receipt) => {
            println!("{} {} in '{}'", what, receipt.action, receipt.table);
            Ok(())
        }
        Outcome::Rejected { reason } => Err(TallyError::Validation(reason)),
        Outcome::Failed { reason } => Err(TallyError::Sheet(reason)),
    }
}
