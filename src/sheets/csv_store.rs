//! Local CSV table backend
//!
//! Each table is one CSV file under the data directory. Line N of the file is
//! sheet row N. Modifications rewrite the whole file atomically (write to a
//! temp file, then rename) so a crash never leaves a half-written table.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use log::debug;

use super::{Grid, SheetStore};
use crate::config::{TableLayout, TallyPaths};
use crate::error::{TallyError, TallyResult};

/// Table store backed by CSV files
#[derive(Debug, Clone)]
pub struct CsvStore {
    paths: TallyPaths,
}

impl CsvStore {
    pub fn new(paths: TallyPaths) -> Self {
        Self { paths }
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.paths.table_file(table)
    }
}

impl SheetStore for CsvStore {
    fn read_grid(&self, table: &str) -> TallyResult<Grid> {
        let path = self.table_path(table);
        if !path.exists() {
            return Err(TallyError::Sheet(format!(
                "table '{}' not found at {} (run 'tally init')",
                table,
                path.display()
            )));
        }
        read_grid(&path)
    }

    fn append_row(&self, table: &str, cells: &[String]) -> TallyResult<()> {
        let path = self.table_path(table);
        let mut grid = self.read_grid(table)?;

        // Land right after the last populated row, like a spreadsheet append
        while grid
            .last()
            .is_some_and(|row| row.iter().all(|c| c.trim().is_empty()))
        {
            grid.pop();
        }
        grid.push(cells.to_vec());

        write_grid_atomic(&path, &grid)
    }

    fn update_cell(&self, table: &str, row: usize, column: usize, value: &str) -> TallyResult<()> {
        if row == 0 || column == 0 {
            return Err(TallyError::Sheet(format!(
                "invalid cell ({}, {}); rows and columns start at 1",
                row, column
            )));
        }

        let path = self.table_path(table);
        let mut grid = self.read_grid(table)?;

        if grid.len() < row {
            grid.resize(row, Vec::new());
        }
        let cells = &mut grid[row - 1];
        if cells.len() < column {
            cells.resize(column, String::new());
        }
        cells[column - 1] = value.to_string();

        write_grid_atomic(&path, &grid)
    }

    /// Existing files are left untouched
    fn initialize_table(&self, layout: &TableLayout, headers: &[&str]) -> TallyResult<bool> {
        let path = self.table_path(&layout.name);
        if path.exists() {
            return Ok(false);
        }

        let mut grid: Grid = vec![Vec::new(); layout.header_row.saturating_sub(1)];
        grid.push(headers.iter().map(|h| h.to_string()).collect());
        write_grid_atomic(&path, &grid)?;

        debug!("created table file {}", path.display());
        Ok(true)
    }
}

fn read_grid(path: &Path) -> TallyResult<Grid> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| TallyError::Csv(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut grid: Grid = Vec::new();
    for result in reader.records() {
        let record = result
            .map_err(|e| TallyError::Csv(format!("Failed to parse {}: {}", path.display(), e)))?;

        // The reader skips empty lines, so place records by their line number
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(grid.len() + 1);
        if grid.len() < line - 1 {
            grid.resize(line - 1, Vec::new());
        }
        grid.push(record.iter().map(str::to_string).collect());
    }

    Ok(grid)
}

/// Write a grid to a CSV file atomically (write to temp, then rename)
fn write_grid_atomic(path: &Path, grid: &Grid) -> TallyResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            TallyError::Io(format!("Failed to create directory {}: {}", parent.display(), e))
        })?;
    }

    let width = grid.iter().map(Vec::len).max().unwrap_or(1).max(1);
    let temp_path = path.with_extension("csv.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| TallyError::Io(format!("Failed to create temp file: {}", e)))?;

    {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_writer(BufWriter::new(&file));

        for row in grid {
            // Pad so blank rows keep their line and are not skipped on read
            let mut cells = row.clone();
            if cells.len() < width {
                cells.resize(width, String::new());
            }
            writer.write_record(&cells)?;
        }

        writer
            .flush()
            .map_err(|e| TallyError::Io(format!("Failed to flush data: {}", e)))?;
    }

    file.sync_all()
        .map_err(|e| TallyError::Io(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        TallyError::Io(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::{rows_from_grid, BUDGET_HEADERS, EXPENSE_HEADERS};
    use tempfile::TempDir;

    fn create_store() -> (TempDir, CsvStore) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, CsvStore::new(paths))
    }

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_initialize_places_header_on_configured_row() {
        let (_temp_dir, store) = create_store();
        let layout = TableLayout::new("Transactions", 4);

        assert!(store.initialize_table(&layout, &EXPENSE_HEADERS).unwrap());
        assert!(!store.initialize_table(&layout, &EXPENSE_HEADERS).unwrap());

        let grid = store.read_grid("Transactions").unwrap();
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[3], cells(&EXPENSE_HEADERS));
        assert!(rows_from_grid(&grid, &layout, &EXPENSE_HEADERS).unwrap().is_empty());
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let (_temp_dir, store) = create_store();
        assert!(matches!(store.read_grid("Income"), Err(TallyError::Sheet(_))));
        assert!(store.append_row("Income", &cells(&["a"])).is_err());
    }

    #[test]
    fn test_append_rows() {
        let (_temp_dir, store) = create_store();
        let layout = TableLayout::new("Transactions", 4);
        store.initialize_table(&layout, &EXPENSE_HEADERS).unwrap();

        store
            .append_row("Transactions", &cells(&["05/01/2024", "500.00", "Veg, fruit", "Food"]))
            .unwrap();
        store
            .append_row("Transactions", &cells(&["10/01/2024", "1500.00", "", "Food"]))
            .unwrap();

        let grid = store.read_grid("Transactions").unwrap();
        let rows = rows_from_grid(&grid, &layout, &EXPENSE_HEADERS).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, 5);
        assert_eq!(rows[0].get("Description"), "Veg, fruit");
        assert_eq!(rows[1].row, 6);
    }

    #[test]
    fn test_update_cell_in_place() {
        let (_temp_dir, store) = create_store();
        let layout = TableLayout::new("Budgets", 1);
        store.initialize_table(&layout, &BUDGET_HEADERS).unwrap();
        store
            .append_row("Budgets", &cells(&["2024-01", "Food", "1000.00"]))
            .unwrap();

        store.update_cell("Budgets", 2, 3, "1200.00").unwrap();

        let grid = store.read_grid("Budgets").unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1], cells(&["2024-01", "Food", "1200.00"]));
    }

    #[test]
    fn test_update_cell_rejects_zero_coordinates() {
        let (_temp_dir, store) = create_store();
        let layout = TableLayout::new("Budgets", 1);
        store.initialize_table(&layout, &BUDGET_HEADERS).unwrap();
        assert!(store.update_cell("Budgets", 0, 1, "x").is_err());
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let (temp_dir, store) = create_store();
        let layout = TableLayout::new("Income", 1);
        store.initialize_table(&layout, &["Date", "Amount"]).unwrap();

        let temp_path = temp_dir.path().join("data").join("Income.csv.tmp");
        assert!(!temp_path.exists());
    }

    #[test]
    fn test_hand_edited_blank_lines_keep_row_numbers() {
        let (temp_dir, store) = create_store();
        let path = temp_dir.path().join("data").join("Budgets.csv");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "Month,Category,BudgetAmount\n\n2024-01,Food,1000\n").unwrap();

        let grid = store.read_grid("Budgets").unwrap();
        let layout = TableLayout::new("Budgets", 1);
        let rows = rows_from_grid(&grid, &layout, &BUDGET_HEADERS).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row, 3);
    }
}
