//! Category Report
//!
//! Spending per category for one month, joined against that month's budgets.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::error::TallyResult;
use crate::models::{BudgetRecord, ExpenseRecord, Money, Month};

/// Label shown for expenses recorded without a category
pub const UNCATEGORIZED_LABEL: &str = "(uncategorized)";

/// How a category's spend compares to its budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BudgetStatus {
    OverBudget,
    WithinBudget,
    NoBudget,
}

impl BudgetStatus {
    /// Over only when a positive budget is exceeded; a zero budget is "no budget"
    pub fn classify(spent: Money, budget: Money) -> Self {
        if !budget.is_positive() {
            BudgetStatus::NoBudget
        } else if spent > budget {
            BudgetStatus::OverBudget
        } else {
            BudgetStatus::WithinBudget
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetStatus::OverBudget => write!(f, "Over Budget"),
            BudgetStatus::WithinBudget => write!(f, "Within Budget"),
            BudgetStatus::NoBudget => write!(f, "No Budget"),
        }
    }
}

/// A row in the category report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReportRow {
    /// Category label as stored; empty for uncategorized spend
    pub category: String,
    pub spent: Money,
    /// Budget for the month, zero when none is set
    pub budget: Money,
    pub status: BudgetStatus,
    /// spent - budget; positive means overspent
    pub delta: Money,
    /// Percent of the month's total spend
    pub share: f64,
}

impl CategoryReportRow {
    /// Category label for display
    pub fn label(&self) -> &str {
        if self.category.is_empty() {
            UNCATEGORIZED_LABEL
        } else {
            &self.category
        }
    }
}

/// Category Report for a month
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryReport {
    pub month: Month,
    /// Sorted by spend, largest first
    pub rows: Vec<CategoryReportRow>,
    pub total_spent: Money,
    pub total_budget: Money,
}

impl CategoryReport {
    /// Build the report from already-filtered expenses of the month
    ///
    /// `expenses` must only hold records of `month` with exclusions applied.
    /// Budgets may span any months; only those of `month` are used. When the
    /// budgets table holds the same (month, category) twice, the later row
    /// wins.
    pub fn generate(month: Month, expenses: &[&ExpenseRecord], budgets: &[BudgetRecord]) -> Self {
        let mut spent_by_category: HashMap<&str, Money> = HashMap::new();
        for expense in expenses {
            *spent_by_category
                .entry(expense.category.as_str())
                .or_insert_with(Money::zero) += expense.amount;
        }

        let mut budget_by_category: HashMap<&str, Money> = HashMap::new();
        for budget in budgets.iter().filter(|b| b.month == month) {
            budget_by_category.insert(budget.category.as_str(), budget.budget_amount);
        }

        let total_spent: Money = spent_by_category.values().sum();

        let mut rows: Vec<CategoryReportRow> = spent_by_category
            .into_iter()
            .map(|(category, spent)| {
                let budget = budget_by_category
                    .get(category)
                    .copied()
                    .unwrap_or_default();
                CategoryReportRow {
                    category: category.to_string(),
                    spent,
                    budget,
                    status: BudgetStatus::classify(spent, budget),
                    delta: spent - budget,
                    share: share_of(spent, total_spent),
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            b.spent
                .cmp(&a.spent)
                .then_with(|| a.category.cmp(&b.category))
        });

        let total_budget: Money = rows.iter().map(|r| r.budget).sum();

        Self {
            month,
            rows,
            total_spent,
            total_budget,
        }
    }

    /// Categories that went over budget
    pub fn over_budget(&self) -> impl Iterator<Item = &CategoryReportRow> {
        self.rows
            .iter()
            .filter(|r| r.status == BudgetStatus::OverBudget)
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> TallyResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Month", "Category", "Spent", "Budget", "Delta", "Status", "Share"])?;

        for row in &self.rows {
            csv.write_record([
                self.month.to_string(),
                row.category.clone(),
                row.spent.to_plain_string(),
                row.budget.to_plain_string(),
                row.delta.to_plain_string(),
                format!("{:?}", row.status),
                format!("{:.2}", row.share),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}

fn share_of(part: Money, total: Money) -> f64 {
    if total.is_zero() {
        0.0
    } else {
        part.cents() as f64 / total.cents() as f64 * 100.0
    }
}
