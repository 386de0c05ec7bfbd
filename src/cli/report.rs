//! Report CLI commands
//!
//! The dashboard, split into commands: month summary, category breakdown,
//! record listing, monthly trend, and the list of months with data.

use std::io::{self, IsTerminal};

use clap::{Args, Subcommand};

use crate::app::{App, LedgerData};
use crate::display::{
    format_category_table, format_records, format_share_chart, format_summary, format_trend_table,
};
use crate::error::{TallyError, TallyResult};
use crate::models::Month;
use crate::reports::{
    available_months, expense_categories, records_for_month, summarize, TrendReport,
    UNCATEGORIZED_LABEL,
};

/// Month selection and category exclusions shared by the report commands
#[derive(Args, Debug, Clone, Default)]
pub struct ReportFilter {
    /// Month (YYYY-MM), defaults to the latest month with data
    #[arg(short, long)]
    pub month: Option<String>,

    /// Category to leave out of totals (repeatable); defaults to settings
    #[arg(short = 'x', long = "exclude")]
    pub exclude: Vec<String>,

    /// Include every category, ignoring the default exclusions
    #[arg(long, conflicts_with = "exclude")]
    pub no_exclude: bool,
}

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Totals, category breakdown, and trend for a month
    Summary {
        #[command(flatten)]
        filter: ReportFilter,
    },

    /// Spend per category against budget
    Categories {
        #[command(flatten)]
        filter: ReportFilter,
        /// Write CSV to stdout instead of a table
        #[arg(long)]
        csv: bool,
    },

    /// Individual expense and income records of a month
    Records {
        #[command(flatten)]
        filter: ReportFilter,
    },

    /// Expense and income totals per month
    Trend {
        /// Write CSV to stdout instead of a table
        #[arg(long)]
        csv: bool,
    },

    /// Months with data and the categories seen in expenses
    Months,
}

/// Handle a report command
pub fn handle_report_command(app: &App, cmd: ReportCommands) -> TallyResult<()> {
    let currency = app.settings().currency_symbol.as_str();
    let data = app.load_data();

    match cmd {
        ReportCommands::Summary { filter } => {
            let (month, excluded) = resolve_filter(app, &data, &filter)?;
            let summary = summarize(&data.expenses, &data.incomes, &data.budgets, month, &excluded);

            let color = io::stdout().is_terminal();
            println!("{}", format_summary(&summary, currency, &data.warnings, color));
            println!("{}", format_category_table(&summary.category_report, currency));
            let chart = format_share_chart(&summary.category_report);
            if !chart.is_empty() {
                println!();
                print!("{}", chart);
            }
            println!();
            println!("{}", format_trend_table(&summary.trend, currency));
        }

        ReportCommands::Categories { filter, csv } => {
            let (month, excluded) = resolve_filter(app, &data, &filter)?;
            let summary = summarize(&data.expenses, &data.incomes, &data.budgets, month, &excluded);

            if csv {
                summary.category_report.export_csv(&mut io::stdout())?;
            } else {
                print_warnings(&data);
                println!("Categories: {}", month.format_friendly());
                println!("{}", format_category_table(&summary.category_report, currency));
            }
        }

        ReportCommands::Records { filter } => {
            let (month, excluded) = resolve_filter(app, &data, &filter)?;
            let records = records_for_month(&data.expenses, &data.incomes, month, &excluded);

            print_warnings(&data);
            println!("Records: {}\n", month.format_friendly());
            print!("{}", format_records(&records, currency));
        }

        ReportCommands::Trend { csv } => {
            let trend = TrendReport::generate(&data.expenses, &data.incomes);

            if csv {
                trend.export_csv(&mut io::stdout())?;
            } else {
                print_warnings(&data);
                println!("{}", format_trend_table(&trend, currency));
            }
        }

        ReportCommands::Months => {
            print_warnings(&data);
            let months = available_months(&data.expenses, &data.incomes);
            if months.is_empty() {
                println!("No records yet.");
            } else {
                println!("Months:");
                for month in months.iter().rev() {
                    println!("  {}  {}", month, month.format_friendly());
                }
            }

            let categories = expense_categories(&data.expenses);
            if !categories.is_empty() {
                println!();
                println!("Expense categories:");
                for category in categories {
                    let shown = if category.is_empty() {
                        UNCATEGORIZED_LABEL
                    } else {
                        category.as_str()
                    };
                    println!("  {}", shown);
                }
            }
        }
    }

    Ok(())
}

/// Selected month and the exclusion list to apply
fn resolve_filter(
    app: &App,
    data: &LedgerData,
    filter: &ReportFilter,
) -> TallyResult<(Month, Vec<String>)> {
    let month = match &filter.month {
        Some(raw) => {
            Month::parse(raw.trim()).map_err(|e| TallyError::Validation(e.to_string()))?
        }
        None => data.latest_month().unwrap_or_else(Month::current),
    };

    let excluded = if filter.no_exclude {
        Vec::new()
    } else if filter.exclude.is_empty() {
        app.settings().default_excluded_categories.clone()
    } else {
        filter.exclude.clone()
    };

    Ok((month, excluded))
}

fn print_warnings(data: &LedgerData) {
    for warning in &data.warnings {
        println!("warning: {}", warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, TallyPaths};
    use crate::models::{ExpenseRecord, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_app() -> (TempDir, App) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let app = App::open(paths, Settings::default()).unwrap();
        (temp_dir, app)
    }

    fn data_with_march() -> LedgerData {
        LedgerData {
            expenses: vec![ExpenseRecord::new(
                NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
                Money::from_units(10),
                "",
                "Food",
            )],
            ..LedgerData::default()
        }
    }

    #[test]
    fn test_filter_defaults_to_latest_month_and_settings_exclusions() {
        let (_temp_dir, app) = create_app();
        let (month, excluded) =
            resolve_filter(&app, &data_with_march(), &ReportFilter::default()).unwrap();

        assert_eq!(month, Month::new(2024, 3).unwrap());
        assert_eq!(excluded, vec!["Farmhouse".to_string()]);
    }

    #[test]
    fn test_filter_explicit_values() {
        let (_temp_dir, app) = create_app();
        let filter = ReportFilter {
            month: Some("2024-01".into()),
            exclude: vec!["EMI".into()],
            no_exclude: false,
        };
        let (month, excluded) = resolve_filter(&app, &data_with_march(), &filter).unwrap();
        assert_eq!(month, Month::new(2024, 1).unwrap());
        assert_eq!(excluded, vec!["EMI".to_string()]);

        let filter = ReportFilter {
            no_exclude: true,
            ..ReportFilter::default()
        };
        let (_, excluded) = resolve_filter(&app, &data_with_march(), &filter).unwrap();
        assert!(excluded.is_empty());
    }

    #[test]
    fn test_filter_rejects_bad_month() {
        let (_temp_dir, app) = create_app();
        let filter = ReportFilter {
            month: Some("March".into()),
            ..ReportFilter::default()
        };
        assert!(resolve_filter(&app, &LedgerData::default(), &filter).is_err());
    }
}
