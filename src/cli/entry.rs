//! Expense and income CLI commands
//!
//! Implements the entry form: recording a new expense or income row.

use clap::Subcommand;
use log::info;

use super::{finish_write, parse_amount_arg, parse_date_arg};
use crate::app::App;
use crate::error::{TallyError, TallyResult};
use crate::services::matches_vocabulary;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Amount (e.g., "1500" or "1,500.50")
        amount: String,
        /// What the money was spent on
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// Category; suggested from the description when omitted
        #[arg(short, long)]
        category: Option<String>,
        /// Date (DD/MM/YYYY or YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
}

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Record income
    Add {
        /// Amount (e.g., "50000")
        amount: String,
        /// Where the income came from
        #[arg(short, long)]
        source: String,
        /// Optional note
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// Date (DD/MM/YYYY or YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
}

/// Handle an expense command
pub fn handle_expense_command(app: &App, cmd: ExpenseCommands) -> TallyResult<()> {
    match cmd {
        ExpenseCommands::Add {
            amount,
            description,
            category,
            date,
        } => {
            let amount = parse_amount_arg(&amount)?;
            let date = parse_date_arg(date.as_deref())?;
            let description = description.unwrap_or_default();

            let category = match category {
                Some(category) => category,
                None => suggest_for(app, &description)?,
            };

            let outcome = app
                .writer()
                .add_expense(date, amount, &description, &category);
            finish_write(outcome, "Expense")
        }
    }
}

/// Handle an income command
pub fn handle_income_command(app: &App, cmd: IncomeCommands) -> TallyResult<()> {
    match cmd {
        IncomeCommands::Add {
            amount,
            source,
            description,
            date,
        } => {
            let amount = parse_amount_arg(&amount)?;
            let date = parse_date_arg(date.as_deref())?;
            let description = description.unwrap_or_default();

            let outcome = app.writer().add_income(date, amount, &source, &description);
            finish_write(outcome, "Income")
        }
    }
}

/// Ask the classification service for a category, refusing to guess
fn suggest_for(app: &App, description: &str) -> TallyResult<String> {
    if description.trim().is_empty() {
        return Err(TallyError::Validation(
            "Please enter a category (or a description to suggest one)".into(),
        ));
    }

    let suggestion = app.suggester()?.suggest_category(description);
    if suggestion.is_empty() {
        return Err(TallyError::Validation(
            "No category suggestion available; please pass --category".into(),
        ));
    }

    if matches_vocabulary(&suggestion) {
        println!("Suggested category: {}", suggestion);
    } else {
        println!("Suggested category: {} (not in the usual list)", suggestion);
    }
    info!("using suggested category '{}'", suggestion);
    Ok(suggestion)
}
