use anyhow::Result;
use clap::{Parser, Subcommand};

use tally_sheet::app::App;
use tally_sheet::cli::{
    handle_budget_command, handle_expense_command, handle_income_command, handle_report_command,
    handle_suggest_command, BudgetCommands, ExpenseCommands, IncomeCommands, ReportCommands,
};
use tally_sheet::config::{Backend, Settings, TallyPaths};

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Spreadsheet-backed expense and income tracker",
    long_about = "Tally records expenses, income, and monthly category budgets in a \
                  spreadsheet (or local CSV files) and reports totals, budget status, \
                  and monthly trends from the command line."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Expense entry commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Income entry commands
    #[command(subcommand)]
    Income(IncomeCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Dashboard reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Suggest a category for an expense description
    Suggest {
        /// Expense description
        description: String,
    },

    /// Initialize settings and lay out the ledger tables
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let paths = TallyPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Tally at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            let app = App::open(paths, settings)?;
            let created = app.ledger().initialize()?;

            if created.is_empty() {
                println!("All tables already present.");
            } else {
                for table in &created {
                    println!("  created table '{}'", table);
                }
            }
            println!("Initialization complete!");
            println!();
            println!("Run 'tally expense add --help' to record your first expense.");
        }
        Some(Commands::Config) => {
            println!("Tally Configuration");
            println!("===================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!();
            println!("Settings:");
            match settings.backend {
                Backend::Csv => println!("  Backend:          csv"),
                Backend::Sheets => println!(
                    "  Backend:          sheets ({})",
                    settings.spreadsheet_id.as_deref().unwrap_or("no spreadsheet id")
                ),
            }
            let tables = &settings.tables;
            for layout in [&tables.expenses, &tables.income, &tables.budgets] {
                println!(
                    "  Table:            {} (header on row {})",
                    layout.name, layout.header_row
                );
            }
            println!(
                "  Classifier:       {} ({}, {})",
                settings.classifier.base_url,
                settings.classifier.model,
                if settings.classifier.enabled { "enabled" } else { "disabled" }
            );
            println!("  Cache window:     {}s", settings.cache_ttl_secs);
            println!(
                "  Excluded:         {}",
                settings.default_excluded_categories.join(", ")
            );
        }
        Some(Commands::Expense(cmd)) => {
            let app = App::open(paths, settings)?;
            handle_expense_command(&app, cmd)?;
        }
        Some(Commands::Income(cmd)) => {
            let app = App::open(paths, settings)?;
            handle_income_command(&app, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            let app = App::open(paths, settings)?;
            handle_budget_command(&app, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            let app = App::open(paths, settings)?;
            handle_report_command(&app, cmd)?;
        }
        Some(Commands::Suggest { description }) => {
            let app = App::open(paths, settings)?;
            handle_suggest_command(&app, &description)?;
        }
        None => {
            println!("Tally - spreadsheet-backed expense and income tracker");
            println!();
            println!("Run 'tally --help' for usage information.");
            println!("Run 'tally init' to set up the ledger tables.");
        }
    }

    Ok(())
}
