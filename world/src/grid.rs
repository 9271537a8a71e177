//! Dense cell storage backing the playfield.

use snake_arcade_core::{CellCoord, CellKind, GridView};
use thiserror::Error;

/// Fixed-size, row-major grid of cell contents.
///
/// The grid holds no policy: it answers bounds and occupancy questions and
/// stores whatever it is told to store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Creates an empty grid with the provided dimensions.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![CellKind::Empty; capacity],
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether signed coordinates fall inside the grid.
    #[must_use]
    pub fn is_in_bounds(&self, column: i64, row: i64) -> bool {
        CellCoord::from_signed(column, row, self.columns, self.rows).is_some()
    }

    /// Contents of the provided cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn cell_at(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Overwrites the contents of the provided cell.
    pub fn set_cell(&mut self, cell: CellCoord, kind: CellKind) -> Result<(), GridError> {
        let (columns, rows) = (self.columns, self.rows);
        let slot = self
            .index(cell)
            .and_then(|index| self.cells.get_mut(index))
            .ok_or(GridError::OutOfBounds {
                cell,
                columns,
                rows,
            })?;
        *slot = kind;
        Ok(())
    }

    /// Resets every cell to [`CellKind::Empty`].
    pub fn clear(&mut self) {
        self.cells.fill(CellKind::Empty);
    }

    /// Iterates over every cell holding `kind` in row-major order.
    pub fn cells_of(&self, kind: CellKind) -> impl Iterator<Item = CellCoord> + '_ {
        let columns = self.columns.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, stored)| **stored == kind)
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                Some(CellCoord::new(index % columns, index / columns))
            })
    }

    /// Captures a read-only view for systems.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Errors reported by [`Grid`] mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The cell lies outside the grid.
    #[error("cell {cell} lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Cell named by the mutation.
        cell: CellCoord,
        /// Grid columns.
        columns: u32,
        /// Grid rows.
        rows: u32,
    },
}
