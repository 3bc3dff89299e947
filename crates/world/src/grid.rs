use std::fmt;

use tilebot_core::{PlannerError, Result};

use crate::Cell;

/// A fixed-size boolean map over the tile grid.
///
/// Cells are stored row-major. Reads outside the grid return `false`, which
/// lets neighbour probes at the edges stay branch-free.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates an all-empty grid.
    ///
    /// # Errors
    /// Returns `PlannerError::EmptyGrid` if either dimension is zero.
    pub fn new(height: usize, width: usize) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(PlannerError::EmptyGrid);
        }
        Ok(Grid {
            height,
            width,
            cells: vec![false; height * width],
        })
    }

    /// Builds a grid from nested rows, e.g. the output of a perception layer.
    ///
    /// # Errors
    /// Returns an error if there are no cells or the rows differ in length.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut grid = Grid::new(height, width)?;
        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != width {
                return Err(PlannerError::RaggedRow {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            grid.cells[row * width..(row + 1) * width].copy_from_slice(cells);
        }
        Ok(grid)
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns (height, width).
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Returns the value at `cell`, or `false` if it lies outside the grid.
    #[inline]
    pub fn get(&self, cell: Cell) -> bool {
        self.contains(cell) && self.cells[cell.row * self.width + cell.col]
    }

    /// Signed lookup: negative or oversized coordinates read as `false`.
    #[inline]
    pub fn get_signed(&self, row: isize, col: isize) -> bool {
        match (usize::try_from(row), usize::try_from(col)) {
            (Ok(row), Ok(col)) => self.get(Cell::new(row, col)),
            _ => false,
        }
    }

    /// Sets the value at `cell`.
    ///
    /// # Errors
    /// Returns `PlannerError::OutOfBounds` if `cell` lies outside the grid.
    pub fn set(&mut self, cell: Cell, value: bool) -> Result<()> {
        if !self.contains(cell) {
            return Err(PlannerError::OutOfBounds {
                row: cell.row as isize,
                col: cell.col as isize,
            });
        }
        self.cells[cell.row * self.width + cell.col] = value;
        Ok(())
    }

    /// Number of occupied cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Occupied cells in row-major scan order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &set)| set)
            .map(move |(i, _)| Cell::new(i / width, i % width))
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid({}x{})", self.height, self.width)?;
        write!(f, "{}", self)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let c = if self.get(Cell::new(row, col)) { 'X' } else { '.' };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
