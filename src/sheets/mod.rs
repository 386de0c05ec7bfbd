//! Tabular store layer for Tally
//!
//! The ledger lives in three tables of a spreadsheet. This module defines the
//! [`SheetStore`] seam the rest of the crate talks to, the logic that turns a
//! raw cell grid into header-keyed [`RawRow`]s, and two backends: the Google
//! Sheets REST API and local CSV files.

pub mod api_store;
pub mod csv_store;

pub use api_store::SheetsApiStore;
pub use csv_store::CsvStore;

use std::collections::HashMap;

use crate::config::TableLayout;
use crate::error::{TallyError, TallyResult};

/// Expected header cells of the expenses table, in write order
pub const EXPENSE_HEADERS: [&str; 4] = ["Date", "Amount", "Description", "Category"];

/// Expected header cells of the income table, in write order
pub const INCOME_HEADERS: [&str; 4] = ["Date", "Amount", "Description", "Source"];

/// Expected header cells of the budgets table, in write order
pub const BUDGET_HEADERS: [&str; 3] = ["Month", "Category", "BudgetAmount"];

/// A rectangular-ish block of cell text, one inner Vec per sheet row
///
/// Index 0 is sheet row 1. Rows may be shorter than the header; missing
/// trailing cells read as empty.
pub type Grid = Vec<Vec<String>>;

/// Remote key/row store holding the ledger tables
///
/// Row and column numbers are 1-based sheet coordinates.
pub trait SheetStore {
    /// Read every populated row of a table
    fn read_grid(&self, table: &str) -> TallyResult<Grid>;

    /// Append a row after the last populated row of a table
    fn append_row(&self, table: &str, cells: &[String]) -> TallyResult<()>;

    /// Overwrite one cell
    fn update_cell(&self, table: &str, row: usize, column: usize, value: &str) -> TallyResult<()>;

    /// Make sure a table exists with its header on the layout's header row
    ///
    /// Returns true when the table had to be created. Stores that cannot
    /// create tables only verify the header is where the layout says it is.
    fn initialize_table(&self, layout: &TableLayout, headers: &[&str]) -> TallyResult<bool> {
        let grid = self.read_grid(&layout.name)?;
        header_columns(&grid, layout, headers)?;
        Ok(false)
    }
}

/// One data row of a table, keyed by header text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based sheet row number
    pub row: usize,
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new(row: usize, cells: HashMap<String, String>) -> Self {
        Self { row, cells }
    }

    /// Build a row from header/value pairs, mostly for tests
    pub fn from_pairs<'a, I>(row: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            row,
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Cell text under a header, empty when the column is absent
    pub fn get(&self, header: &str) -> &str {
        self.cells.get(header).map(String::as_str).unwrap_or("")
    }

    /// True when every cell is blank
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }
}

/// Locate each expected header in the layout's header row
///
/// Returns 0-based column indexes in the order of `expected`.
pub fn header_columns(
    grid: &Grid,
    layout: &TableLayout,
    expected: &[&str],
) -> TallyResult<Vec<usize>> {
    let header = layout
        .header_row
        .checked_sub(1)
        .and_then(|index| grid.get(index))
        .ok_or_else(|| {
            let first = expected.first().copied().unwrap_or_default();
            TallyError::missing_header(&layout.name, first, layout.header_row)
        })?;

    expected
        .iter()
        .map(|name| {
            header
                .iter()
                .position(|cell| cell.trim() == *name)
                .ok_or_else(|| TallyError::missing_header(&layout.name, *name, layout.header_row))
        })
        .collect()
}

/// Turn a grid into data rows below the layout's header row
///
/// Rows above the header are ignored, columns with a blank header cell are
/// dropped, and rows whose remaining cells are all blank are discarded.
pub fn rows_from_grid(grid: &Grid, layout: &TableLayout, expected: &[&str]) -> TallyResult<Vec<RawRow>> {
    header_columns(grid, layout, expected)?;

    let header: Vec<String> = grid[layout.header_row - 1]
        .iter()
        .map(|cell| cell.trim().to_string())
        .collect();

    let rows = grid
        .iter()
        .enumerate()
        .skip(layout.header_row)
        .map(|(index, cells)| {
            let named = header
                .iter()
                .enumerate()
                .filter(|(_, name)| !name.is_empty())
                .map(|(col, name)| {
                    let value = cells.get(col).cloned().unwrap_or_default();
                    (name.clone(), value)
                })
                .collect();
            RawRow::new(index + 1, named)
        })
        .filter(|row| !row.is_blank())
        .collect();

    Ok(rows)
}

/// Lay out values under their header columns for a new row
///
/// `columns` holds the 0-based column of each value, as returned by
/// [`header_columns`]. Columns without a value are left blank.
pub fn place_cells(columns: &[usize], values: &[String]) -> Vec<String> {
    let width = columns.iter().max().map_or(0, |max| max + 1);
    let mut cells = vec![String::new(); width];
    for (column, value) in columns.iter().zip(values) {
        cells[*column] = value.clone();
    }
    cells
}

/// Spreadsheet column letters for a 1-based column number (1 → A, 27 → AA)
pub fn column_letter(column: usize) -> String {
    let mut n = column;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_rows_below_offset_header() {
        let g = grid(&[
            &["Monthly spend"],
            &[],
            &[""],
            &["Date", "Amount", "Description", "Category"],
            &["05/01/2024", "₹500", "Veg", "Food"],
            &["", "", "", ""],
            &["10/01/2024", "1,500", "", "Food"],
        ]);
        let layout = TableLayout::new("Transactions", 4);
        let rows = rows_from_grid(&g, &layout, &EXPENSE_HEADERS).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, 5);
        assert_eq!(rows[0].get("Amount"), "₹500");
        assert_eq!(rows[1].row, 7);
        assert_eq!(rows[1].get("Description"), "");
    }

    #[test]
    fn test_blank_header_columns_dropped() {
        let g = grid(&[
            &["Month", "Category", "BudgetAmount", "", "Notes"],
            &["2024-01", "Food", "1000", "stray", "ok"],
            &["", "", "", "only stray", ""],
        ]);
        let layout = TableLayout::new("Budgets", 1);
        let rows = rows_from_grid(&g, &layout, &BUDGET_HEADERS).unwrap();

        // Second data row only has a value under a blank header, so it is blank
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Notes"), "ok");
        assert_eq!(rows[0].get(""), "");
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let g = grid(&[
            &["Date", "Amount", "Description", "Source"],
            &["01/02/2024", "50000"],
        ]);
        let layout = TableLayout::new("Income", 1);
        let rows = rows_from_grid(&g, &layout, &INCOME_HEADERS).unwrap();
        assert_eq!(rows[0].get("Source"), "");
    }

    #[test]
    fn test_missing_header_is_an_error() {
        let g = grid(&[&["Date", "Amount", "Description"]]);
        let layout = TableLayout::new("Income", 1);
        let err = rows_from_grid(&g, &layout, &INCOME_HEADERS).unwrap_err();
        assert!(matches!(err, TallyError::MissingHeader { ref header, .. } if header == "Source"));
    }

    #[test]
    fn test_header_row_beyond_grid() {
        let g = grid(&[&["Date"]]);
        let layout = TableLayout::new("Transactions", 4);
        assert!(rows_from_grid(&g, &layout, &EXPENSE_HEADERS).is_err());
    }

    #[test]
    fn test_header_columns() {
        let g = grid(&[&["Category", "Month", "BudgetAmount"]]);
        let layout = TableLayout::new("Budgets", 1);
        let cols = header_columns(&g, &layout, &BUDGET_HEADERS).unwrap();
        assert_eq!(cols, vec![1, 0, 2]);
    }

    #[test]
    fn test_place_cells_follows_header_order() {
        let values: Vec<String> = ["2024-01", "Food", "1000.00"]
            .iter()
            .map(|v| v.to_string())
            .collect();

        assert_eq!(place_cells(&[0, 1, 2], &values), values);
        assert_eq!(
            place_cells(&[2, 3, 1], &values),
            vec!["", "1000.00", "2024-01", "Food"]
        );
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(3), "C");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(52), "AZ");
        assert_eq!(column_letter(703), "AAA");
    }
}
