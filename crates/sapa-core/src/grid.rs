//! State backing an on-screen data grid.

use crate::table::check_width;
use crate::{CellValue, CoreError, Row};

/// Columns, rows and selection of a display grid.
///
/// The grid is owned by the UI; it is only mutated from the UI context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataGrid {
    columns: Vec<String>,
    rows: Vec<Row>,
    selected: Option<usize>,
}

impl DataGrid {
    /// Create an empty grid with the given column labels.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            selected: None,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Remove every row.
    pub fn clear_rows(&mut self) {
        self.rows.clear();
        self.selected = None;
    }

    /// Append a row at the end of the grid.
    pub fn append_row(&mut self, row: Row) -> Result<(), CoreError> {
        check_width(self.rows.len(), self.columns.len(), &row)?;
        self.rows.push(row);
        if self.selected.is_none() {
            self.selected = Some(0);
        }
        Ok(())
    }

    /// Check that rows fit this grid without modifying it.
    pub fn validate_rows(&self, rows: &[Row]) -> Result<(), CoreError> {
        rows.iter()
            .enumerate()
            .try_for_each(|(i, row)| check_width(i, self.columns.len(), row))
    }

    /// Currently selected row index.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Currently selected row.
    pub fn selected_row(&self) -> Option<&Row> {
        self.selected.and_then(|i| self.rows.get(i))
    }

    /// Cell of the selected row at `column`.
    pub fn selected_cell(&self, column: usize) -> Option<&CellValue> {
        self.selected_row().and_then(|row| row.get(column))
    }

    /// Select the next row (stops at the last one).
    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let next = self.selected.map_or(0, |i| (i + 1).min(self.rows.len() - 1));
        self.selected = Some(next);
    }

    /// Select the previous row (stops at the first one).
    pub fn select_prev(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let prev = self.selected.map_or(0, |i| i.saturating_sub(1));
        self.selected = Some(prev);
    }

    /// Keep the selection within bounds, preferring the previous index.
    pub fn clamp_selection(&mut self, previous: Option<usize>) {
        self.selected = match (previous, self.rows.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(n: i64) -> DataGrid {
        let mut grid = DataGrid::new(["ID"]);
        for i in 0..n {
            grid.append_row(vec![i.into()]).unwrap();
        }
        grid
    }

    #[test]
    fn test_append_row_checks_width() {
        let mut grid = DataGrid::new(["A", "B"]);
        assert!(grid.append_row(vec![1.into()]).is_err());
        assert!(grid.is_empty());
    }

    #[test]
    fn test_selection_moves_within_bounds() {
        let mut grid = grid_with(3);
        assert_eq!(grid.selected(), Some(0));

        grid.select_prev();
        assert_eq!(grid.selected(), Some(0));

        grid.select_next();
        grid.select_next();
        grid.select_next();
        assert_eq!(grid.selected(), Some(2));
        assert_eq!(grid.selected_cell(0), Some(&CellValue::Int(2)));
    }

    #[test]
    fn test_clamp_selection() {
        let mut grid = grid_with(2);
        grid.clamp_selection(Some(5));
        assert_eq!(grid.selected(), Some(1));

        grid.clear_rows();
        grid.clamp_selection(Some(1));
        assert_eq!(grid.selected(), None);
    }
}
