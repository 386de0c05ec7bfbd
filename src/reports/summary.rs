//! Dashboard Summary
//!
//! Joins normalized expenses, income, and budgets into the numbers shown on
//! the dashboard for one month: totals, the per-category report, and the
//! all-time monthly trend.

use std::collections::BTreeSet;

use serde::Serialize;

use super::category::CategoryReport;
use super::trend::TrendReport;
use crate::models::{BudgetRecord, ExpenseRecord, IncomeRecord, Money, Month};

/// Month totals after exclusions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MonthlyTotals {
    pub expense: Money,
    pub income: Money,
    /// income - expense
    pub net: Money,
}

/// Everything the dashboard shows for a month
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub month: Month,
    pub excluded: Vec<String>,
    pub totals: MonthlyTotals,
    pub category_report: CategoryReport,
    pub trend: TrendReport,
}

/// Records of one month, expenses already filtered by exclusions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonthRecords {
    pub expenses: Vec<ExpenseRecord>,
    pub incomes: Vec<IncomeRecord>,
}

/// Build the dashboard summary for a month
///
/// Expenses whose category is in `excluded` are left out of the month totals
/// and the category report. Income is never excluded, and the trend always
/// covers every record.
pub fn summarize(
    expenses: &[ExpenseRecord],
    incomes: &[IncomeRecord],
    budgets: &[BudgetRecord],
    month: Month,
    excluded: &[String],
) -> DashboardSummary {
    let month_expenses: Vec<&ExpenseRecord> = expenses
        .iter()
        .filter(|e| e.month() == month && !is_excluded(&e.category, excluded))
        .collect();

    let expense: Money = month_expenses.iter().map(|e| e.amount).sum();
    let income: Money = incomes
        .iter()
        .filter(|i| i.month() == month)
        .map(|i| i.amount)
        .sum();

    DashboardSummary {
        month,
        excluded: excluded.to_vec(),
        totals: MonthlyTotals {
            expense,
            income,
            net: income - expense,
        },
        category_report: CategoryReport::generate(month, &month_expenses, budgets),
        trend: TrendReport::generate(expenses, incomes),
    }
}

/// Sorted union of every month with an expense or income
pub fn available_months(expenses: &[ExpenseRecord], incomes: &[IncomeRecord]) -> Vec<Month> {
    let months: BTreeSet<Month> = expenses
        .iter()
        .map(ExpenseRecord::month)
        .chain(incomes.iter().map(IncomeRecord::month))
        .collect();
    months.into_iter().collect()
}

/// Sorted distinct expense categories, used to offer exclusions
pub fn expense_categories(expenses: &[ExpenseRecord]) -> Vec<String> {
    let categories: BTreeSet<&str> = expenses.iter().map(|e| e.category.as_str()).collect();
    categories.into_iter().map(str::to_string).collect()
}

/// The individual records of a month, newest first
pub fn records_for_month(
    expenses: &[ExpenseRecord],
    incomes: &[IncomeRecord],
    month: Month,
    excluded: &[String],
) -> MonthRecords {
    let mut records = MonthRecords {
        expenses: expenses
            .iter()
            .filter(|e| e.month() == month && !is_excluded(&e.category, excluded))
            .cloned()
            .collect(),
        incomes: incomes
            .iter()
            .filter(|i| i.month() == month)
            .cloned()
            .collect(),
    };

    records.expenses.sort_by(|a, b| b.date.cmp(&a.date));
    records.incomes.sort_by(|a, b| b.date.cmp(&a.date));
    records
}

fn is_excluded(category: &str, excluded: &[String]) -> bool {
    excluded.iter().any(|c| c == category)
}
