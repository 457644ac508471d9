//! Adapting query results to display grids.
//!
//! All functions here mutate UI-owned state and must run on the UI context.

use sapa_core::{CellValue, CoreError, DataGrid, Row, TableResult};

/// Replace the grid's rows with the rows of `result`, in order.
///
/// Every row is checked against the grid's column count first; on a
/// mismatch the grid is left untouched.
pub fn populate(grid: &mut DataGrid, result: &TableResult) -> Result<(), CoreError> {
    grid.validate_rows(result.rows())?;

    let previous = grid.selected();
    grid.clear_rows();
    for row in result.rows() {
        grid.append_row(row.clone())?;
    }
    grid.clamp_selection(previous);
    Ok(())
}

/// Like [`populate`], but an empty result shows a single placeholder row
/// whose first cell is `message`.
pub fn populate_or_placeholder(
    grid: &mut DataGrid,
    result: &TableResult,
    message: &str,
) -> Result<(), CoreError> {
    if !result.is_empty() || grid.column_count() == 0 {
        return populate(grid, result);
    }

    let mut row: Row = vec![CellValue::Null; grid.column_count()];
    row[0] = CellValue::from(message);
    grid.clear_rows();
    grid.append_row(row)?;
    grid.clamp_selection(None);
    Ok(())
}

/// Rebuild the grid with new columns and rows.
///
/// The selected index is kept if it is still in range. On a row width
/// mismatch the grid is left untouched.
pub fn rebuild(grid: &mut DataGrid, columns: Vec<String>, rows: Vec<Row>) -> Result<(), CoreError> {
    let result = TableResult::from_rows(columns, rows)?;
    let mut next = DataGrid::new(result.columns().iter().cloned());
    populate(&mut next, &result)?;
    next.clamp_selection(grid.selected());
    *grid = next;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(rows: Vec<Row>) -> TableResult {
        TableResult::from_rows(["A", "B"], rows).unwrap()
    }

    #[test]
    fn test_populate_twice_leaves_only_second_result() {
        let mut grid = DataGrid::new(["A", "B"]);

        populate(
            &mut grid,
            &result(vec![vec![1.into(), "x".into()], vec![2.into(), "y".into()]]),
        )
        .unwrap();
        assert_eq!(grid.row_count(), 2);

        populate(&mut grid, &result(vec![vec![3.into(), "z".into()]])).unwrap();
        assert_eq!(grid.rows(), [vec![CellValue::Int(3), CellValue::from("z")]]);
    }

    #[test]
    fn test_populate_mismatch_keeps_grid() {
        let mut grid = DataGrid::new(["Only"]);
        grid.append_row(vec!["kept".into()]).unwrap();

        let err = populate(&mut grid, &result(vec![vec![1.into(), "x".into()]])).unwrap_err();
        assert!(matches!(err, CoreError::RowLength { expected: 1, actual: 2, .. }));
        assert_eq!(grid.rows(), [vec![CellValue::from("kept")]]);
    }

    #[test]
    fn test_placeholder_for_empty_result() {
        let mut grid = DataGrid::new(["A", "B"]);
        populate_or_placeholder(&mut grid, &result(vec![]), "No pending users").unwrap();

        assert_eq!(
            grid.rows(),
            [vec![CellValue::from("No pending users"), CellValue::Null]]
        );
    }

    #[test]
    fn test_rebuild_keeps_selection_in_range() {
        let mut grid = DataGrid::new(["A"]);
        for i in 0..5 {
            grid.append_row(vec![i.into()]).unwrap();
        }
        grid.select_next();
        grid.select_next();

        rebuild(&mut grid, vec!["X".into()], vec![vec![1.into()], vec![2.into()]]).unwrap();
        assert_eq!(grid.columns(), ["X"]);
        assert_eq!(grid.selected(), Some(1));
    }

    #[test]
    fn test_rebuild_rejects_ragged_rows() {
        let mut grid = DataGrid::new(["A"]);
        grid.append_row(vec!["kept".into()]).unwrap();

        let err = rebuild(&mut grid, vec!["X".into(), "Y".into()], vec![vec![1.into()]]).unwrap_err();
        assert!(matches!(err, CoreError::RowLength { expected: 2, actual: 1, .. }));
        assert_eq!(grid.columns(), ["A"]);
        assert_eq!(grid.row_count(), 1);
    }
}
