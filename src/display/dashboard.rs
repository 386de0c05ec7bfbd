//! Dashboard display formatting
//!
//! Renders summaries, category reports, trends, and record listings as
//! terminal tables.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::report::{format_bar, format_delta_colored, format_percentage, separator, truncate};
use crate::models::{BudgetRecord, Month};
use crate::reports::{CategoryReport, DashboardSummary, MonthRecords, TrendReport};

const BAR_WIDTH: usize = 30;

#[derive(Tabled)]
struct CategoryLine {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Delta")]
    delta: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct TrendLine {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Expense")]
    expense: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Net")]
    net: String,
}

#[derive(Tabled)]
struct RecordLine {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct BudgetLine {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Budget")]
    budget: String,
}

fn render<T: Tabled>(rows: Vec<T>, numeric_from: usize) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(numeric_from..)).with(Alignment::right()))
        .to_string()
}

/// Month header with totals, warnings, and over-budget alerts
///
/// Overspend amounts are colored only when `color` is set. Colors never go
/// inside table cells.
pub fn format_summary(
    summary: &DashboardSummary,
    currency: &str,
    warnings: &[String],
    color: bool,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Dashboard: {}\n", summary.month.format_friendly()));
    output.push_str(&separator(50));
    output.push('\n');

    for warning in warnings {
        output.push_str(&format!("warning: {}\n", warning));
    }

    let totals = &summary.totals;
    output.push_str(&format!(
        "Total Expense: {:>16}\n",
        totals.expense.format_with_symbol(currency)
    ));
    output.push_str(&format!(
        "Total Income:  {:>16}\n",
        totals.income.format_with_symbol(currency)
    ));
    output.push_str(&format!(
        "Net:           {:>16}\n",
        totals.net.format_with_symbol(currency)
    ));

    if !summary.excluded.is_empty() {
        output.push_str(&format!("Excluded: {}\n", summary.excluded.join(", ")));
    }

    let over: Vec<_> = summary.category_report.over_budget().collect();
    if !over.is_empty() {
        output.push('\n');
        output.push_str("Over budget:\n");
        for row in over {
            let delta = if color {
                format_delta_colored(row.delta, currency)
            } else {
                row.delta.format_with_symbol(currency)
            };
            output.push_str(&format!("  {} by {}\n", row.label(), delta));
        }
    }

    output
}

/// Category report as a table
pub fn format_category_table(report: &CategoryReport, currency: &str) -> String {
    if report.rows.is_empty() {
        return format!("No expenses for {}.", report.month);
    }

    let lines: Vec<CategoryLine> = report
        .rows
        .iter()
        .map(|row| CategoryLine {
            category: row.label().to_string(),
            spent: row.spent.format_with_symbol(currency),
            budget: row.budget.format_with_symbol(currency),
            delta: row.delta.format_with_symbol(currency),
            status: row.status.to_string(),
        })
        .collect();

    render(lines, 1)
}

/// Share of the month's spend per category as horizontal bars
pub fn format_share_chart(report: &CategoryReport) -> String {
    if report.rows.is_empty() {
        return String::new();
    }

    let labels: Vec<String> = report.rows.iter().map(|r| truncate(r.label(), 24)).collect();
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let max_share = report.rows.iter().map(|r| r.share).fold(0.0, f64::max);

    let mut output = String::new();
    for (label, row) in labels.iter().zip(&report.rows) {
        let padding = " ".repeat(width - label.chars().count());
        output.push_str(&format!(
            "{}{}  {} {}\n",
            label,
            padding,
            format_bar(row.share, max_share, BAR_WIDTH),
            format_percentage(row.share)
        ));
    }
    output
}

/// Monthly trend as a table
pub fn format_trend_table(trend: &TrendReport, currency: &str) -> String {
    if trend.rows.is_empty() {
        return "No records yet.".to_string();
    }

    let lines: Vec<TrendLine> = trend
        .rows
        .iter()
        .map(|row| TrendLine {
            month: row.month.to_string(),
            expense: row.expense.format_with_symbol(currency),
            income: row.income.format_with_symbol(currency),
            net: row.net().format_with_symbol(currency),
        })
        .collect();

    render(lines, 1)
}

/// Expense and income records of a month, one table each
pub fn format_records(records: &MonthRecords, currency: &str) -> String {
    let mut output = String::new();

    output.push_str("Expenses\n");
    if records.expenses.is_empty() {
        output.push_str("  (none)\n");
    } else {
        let lines: Vec<RecordLine> = records
            .expenses
            .iter()
            .map(|e| RecordLine {
                date: e.date.format("%d/%m/%Y").to_string(),
                amount: e.amount.format_with_symbol(currency),
                label: display_category(&e.category).to_string(),
                description: truncate(&e.description, 40),
            })
            .collect();
        output.push_str(&render(lines, 1));
        output.push('\n');
    }

    output.push_str("\nIncome\n");
    if records.incomes.is_empty() {
        output.push_str("  (none)\n");
    } else {
        let lines: Vec<RecordLine> = records
            .incomes
            .iter()
            .map(|i| RecordLine {
                date: i.date.format("%d/%m/%Y").to_string(),
                amount: i.amount.format_with_symbol(currency),
                label: i.source.clone(),
                description: truncate(&i.description, 40),
            })
            .collect();
        output.push_str(&render(lines, 1));
        output.push('\n');
    }

    output
}

/// Budgets set for a month
pub fn format_budget_list(month: Month, budgets: &[BudgetRecord], currency: &str) -> String {
    let mut month_budgets: Vec<&BudgetRecord> =
        budgets.iter().filter(|b| b.month == month).collect();
    if month_budgets.is_empty() {
        return format!("No budgets set for {}.", month);
    }
    month_budgets.sort_by(|a, b| a.category.cmp(&b.category));

    let lines: Vec<BudgetLine> = month_budgets
        .iter()
        .map(|b| BudgetLine {
            category: b.category.clone(),
            budget: b.budget_amount.format_with_symbol(currency),
        })
        .collect();

    format!("Budgets for {}\n{}", month.format_friendly(), render(lines, 1))
}

fn display_category(category: &str) -> &str {
    if category.is_empty() {
        crate::reports::UNCATEGORIZED_LABEL
    } else {
        category
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseRecord, Money};
    use crate::reports::summarize;
    use chrono::NaiveDate;

    fn jan() -> Month {
        Month::new(2024, 1).unwrap()
    }

    fn expenses() -> Vec<ExpenseRecord> {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        vec![
            ExpenseRecord::new(date, Money::from_units(1500), "Groceries", "Food"),
            ExpenseRecord::new(date, Money::from_units(500), "Cab", ""),
        ]
    }

    #[test]
    fn test_summary_lists_over_budget() {
        let budgets = vec![BudgetRecord::new(jan(), "Food", Money::from_units(1000))];
        let summary = summarize(&expenses(), &[], &budgets, jan(), &[]);
        let text = format_summary(&summary, "₹", &["Income: offline".to_string()], false);

        assert!(text.contains("Dashboard: January 2024"));
        assert!(text.contains("warning: Income: offline"));
        assert!(text.contains("₹2,000.00"));
        assert!(text.contains("Over budget:"));
        assert!(text.contains("  Food by ₹500.00\n"));
        assert!(!text.contains('\x1b'));

        let colored = format_summary(&summary, "₹", &[], true);
        assert!(colored.contains("Food by \x1b[31m₹500.00\x1b[0m"));
    }

    #[test]
    fn test_category_table_is_plain_text() {
        let budgets = vec![BudgetRecord::new(jan(), "Food", Money::from_units(1000))];
        let summary = summarize(&expenses(), &[], &budgets, jan(), &[]);
        let table = format_category_table(&summary.category_report, "₹");

        assert!(!table.contains('\x1b'));
        let widths: Vec<usize> = table.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_category_table_shows_uncategorized() {
        let summary = summarize(&expenses(), &[], &[], jan(), &[]);
        let table = format_category_table(&summary.category_report, "₹");
        assert!(table.contains("(uncategorized)"));
        assert!(table.contains("No Budget"));
    }

    #[test]
    fn test_share_chart_has_one_line_per_category() {
        let summary = summarize(&expenses(), &[], &[], jan(), &[]);
        let chart = format_share_chart(&summary.category_report);
        assert_eq!(chart.lines().count(), 2);
        assert!(chart.contains("75%"));
        assert!(chart.contains("25%"));
    }

    #[test]
    fn test_empty_outputs() {
        let summary = summarize(&[], &[], &[], jan(), &[]);
        assert_eq!(
            format_category_table(&summary.category_report, "₹"),
            "No expenses for 2024-01."
        );
        assert_eq!(format_trend_table(&summary.trend, "₹"), "No records yet.");
        assert_eq!(format_budget_list(jan(), &[], "₹"), "No budgets set for 2024-01.");
    }

    #[test]
    fn test_budget_list_only_shows_month() {
        let budgets = vec![
            BudgetRecord::new(jan(), "Home", Money::from_units(300)),
            BudgetRecord::new(Month::new(2024, 2).unwrap(), "Pets", Money::from_units(100)),
        ];
        let text = format_budget_list(jan(), &budgets, "₹");
        assert!(text.contains("Home"));
        assert!(!text.contains("Pets"));
    }
}
