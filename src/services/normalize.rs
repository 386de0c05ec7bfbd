//! Row normalization
//!
//! Turns header-keyed raw rows into typed records. Amount cells lose their
//! currency glyphs and thousands separators, dates are read day-first, and
//! the month bucket is derived from the parsed date. Rows that fail either
//! parse are dropped and only counted.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::info;

use crate::models::{BudgetRecord, ExpenseRecord, IncomeRecord, Money, Month};
use crate::sheets::RawRow;

/// Day-first date layouts accepted from the store, tried in order
const DATE_FORMATS: [&str; 9] = [
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%d/%m/%y",
];

/// Header names of the columns a ledger entry is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: String,
    pub amount: String,
    pub description: String,
    /// Category for expenses, source for income
    pub label: String,
}

impl ColumnMap {
    pub fn expenses() -> Self {
        Self {
            date: "Date".into(),
            amount: "Amount".into(),
            description: "Description".into(),
            label: "Category".into(),
        }
    }

    pub fn income() -> Self {
        Self {
            date: "Date".into(),
            amount: "Amount".into(),
            description: "Description".into(),
            label: "Source".into(),
        }
    }
}

/// Records that survived normalization plus how many rows were dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub dropped: usize,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            dropped: 0,
        }
    }
}

/// A parsed ledger entry before it is typed as expense or income
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub date: NaiveDate,
    pub amount: Money,
    pub description: String,
    pub label: String,
}

/// Parse a date cell, day-first
///
/// A trailing time component ("10:30", "10:30:00", or ISO "T10:30:00") is
/// ignored.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(datetime.date());
    }

    let date_part = trimmed
        .split_whitespace()
        .filter(|token| !token.contains(':'))
        .collect::<Vec<_>>()
        .join(" ");

    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(&date_part, format)
            .ok()
            // "%Y" happily reads "24" as year 24; leave two-digit years to "%y"
            .filter(|date| !format.contains("%Y") || date.year() >= 1000)
    })
}

/// Parse an amount cell; negative amounts are not valid ledger amounts
pub fn parse_amount(raw: &str) -> Option<Money> {
    Money::parse(raw).ok().filter(|amount| !amount.is_negative())
}

/// Parse a budget month cell
///
/// Accepts "YYYY-MM" and anything the store may have turned it into when it
/// auto-formatted the cell as a date ("01/01/2024", "Jan 2024").
pub fn parse_month(raw: &str) -> Option<Month> {
    let trimmed = raw.trim();
    if let Ok(month) = Month::parse(trimmed) {
        return Some(month);
    }
    if let Some(date) = parse_date(trimmed) {
        return Some(Month::from_date(date));
    }
    parse_date(&format!("1 {}", trimmed)).map(Month::from_date)
}

/// Normalize raw rows into entries using a column map
pub fn normalize(rows: &[RawRow], columns: &ColumnMap) -> Normalized<Entry> {
    let mut result = Normalized::default();

    for row in rows {
        let date = parse_date(row.get(&columns.date));
        let amount = parse_amount(row.get(&columns.amount));

        match (date, amount) {
            (Some(date), Some(amount)) => result.records.push(Entry {
                date,
                amount,
                description: row.get(&columns.description).trim().to_string(),
                label: row.get(&columns.label).trim().to_string(),
            }),
            _ => result.dropped += 1,
        }
    }

    result
}

pub fn normalize_expenses(rows: &[RawRow]) -> Normalized<ExpenseRecord> {
    let entries = normalize(rows, &ColumnMap::expenses());
    log_dropped("expense", entries.dropped, rows.len());

    Normalized {
        records: entries
            .records
            .into_iter()
            .map(|e| ExpenseRecord::new(e.date, e.amount, e.description, e.label))
            .collect(),
        dropped: entries.dropped,
    }
}

pub fn normalize_income(rows: &[RawRow]) -> Normalized<IncomeRecord> {
    let entries = normalize(rows, &ColumnMap::income());
    log_dropped("income", entries.dropped, rows.len());

    Normalized {
        records: entries
            .records
            .into_iter()
            .map(|e| IncomeRecord::new(e.date, e.amount, e.label, e.description))
            .collect(),
        dropped: entries.dropped,
    }
}

pub fn normalize_budgets(rows: &[RawRow]) -> Normalized<BudgetRecord> {
    let mut result = Normalized::default();

    for row in rows {
        let month = parse_month(row.get("Month"));
        let amount = parse_amount(row.get("BudgetAmount"));
        let category = row.get("Category").trim();

        match (month, amount) {
            (Some(month), Some(amount)) if !category.is_empty() => result
                .records
                .push(BudgetRecord::new(month, category, amount).at_row(row.row)),
            _ => result.dropped += 1,
        }
    }

    log_dropped("budget", result.dropped, rows.len());
    result
}

fn log_dropped(kind: &str, dropped: usize, total: usize) {
    if dropped > 0 {
        info!("dropped {} of {} {} rows with unparsable values", dropped, total, kind);
    }
}
