//! Budget CLI commands
//!
//! Implements CLI commands for setting and viewing monthly category budgets,
//! including the whole-month budget grid.

use clap::Subcommand;

use super::{finish_write, parse_amount_arg, parse_month_arg};
use crate::app::App;
use crate::display::format_budget_list;
use crate::error::{TallyError, TallyResult};
use crate::models::{merged_categories, BudgetRecord, Money, Month};
use crate::outcome::Outcome;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the budget for one category
    Set {
        /// Category name
        category: String,
        /// Amount (e.g., "1000" or "1,000.00")
        amount: String,
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Show the budgets of a month
    Show {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Show or fill the budget grid for a month
    ///
    /// Without entries, prints every category with its current budget. With
    /// CATEGORY=AMOUNT entries, saves each entry whose amount is above zero.
    Grid {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
        /// Entries like "Food=8000"
        entries: Vec<String>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(app: &App, cmd: BudgetCommands) -> TallyResult<()> {
    let currency = app.settings().currency_symbol.as_str();

    match cmd {
        BudgetCommands::Set {
            category,
            amount,
            month,
        } => {
            let month = parse_month_arg(month.as_deref())?;
            let amount = parse_amount_arg(&amount)?;
            let outcome = app.writer().upsert_budget(month, &category, amount);
            finish_write(outcome, "Budget")
        }

        BudgetCommands::Show { month } => {
            let month = parse_month_arg(month.as_deref())?;
            let data = app.load_data();
            for warning in &data.warnings {
                println!("warning: {}", warning);
            }
            println!("{}", format_budget_list(month, &data.budgets, currency));
            Ok(())
        }

        BudgetCommands::Grid { month, entries } => {
            let month = parse_month_arg(month.as_deref())?;
            if entries.is_empty() {
                let data = app.load_data();
                for warning in &data.warnings {
                    println!("warning: {}", warning);
                }
                print!("{}", format_grid(month, &data.budgets, currency));
                return Ok(());
            }

            let parsed = entries
                .iter()
                .map(|entry| parse_grid_entry(entry))
                .collect::<TallyResult<Vec<_>>>()?;

            let results = app.writer().upsert_budgets(month, &parsed);
            if results.is_empty() {
                println!("Nothing to save; every amount was zero.");
                return Ok(());
            }

            let mut failed = 0;
            for (category, outcome) in &results {
                match outcome {
                    Outcome::Success(receipt) => println!("{}: {}", category, receipt.action),
                    other => {
                        failed += 1;
                        println!("{}: {}", category, other);
                    }
                }
            }

            if failed > 0 {
                return Err(TallyError::Sheet(format!(
                    "{} of {} budgets were not saved",
                    failed,
                    results.len()
                )));
            }
            Ok(())
        }
    }
}

/// Parse a "Category=Amount" grid entry
fn parse_grid_entry(entry: &str) -> TallyResult<(String, Money)> {
    let (category, amount) = entry.rsplit_once('=').ok_or_else(|| {
        TallyError::Validation(format!("Expected CATEGORY=AMOUNT, got '{}'", entry))
    })?;

    let category = category.trim();
    if category.is_empty() {
        return Err(TallyError::Validation(format!(
            "Missing category in '{}'",
            entry
        )));
    }
    Ok((category.to_string(), parse_amount_arg(amount)?))
}

/// Every known category with its budget for the month
fn format_grid(month: Month, budgets: &[BudgetRecord], currency: &str) -> String {
    let month_budgets: Vec<&BudgetRecord> = budgets.iter().filter(|b| b.month == month).collect();
    let categories = merged_categories(month_budgets.iter().map(|b| b.category.as_str()));

    let mut output = format!("Budget grid for {}\n", month.format_friendly());
    for category in categories {
        let amount = month_budgets
            .iter()
            .rev()
            .find(|b| b.category == category)
            .map(|b| b.budget_amount)
            .unwrap_or_default();
        output.push_str(&format!(
            "  {:<28} {:>14}\n",
            category,
            amount.format_with_symbol(currency)
        ));
    }
    output
}
