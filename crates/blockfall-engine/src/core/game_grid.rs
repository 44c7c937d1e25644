use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeSeq as _};

use crate::GridDimensionError;

use super::{
    block::{Block, BlockKind},
    position::Position,
};

/// Marker stored in empty cells.
pub const EMPTY_CELL: u8 = 0;

/// Fixed-size matrix of cells recording which block kind occupies each one.
///
/// Cells hold `0` when empty and a [`BlockKind::id`] (1–7) otherwise. The
/// dimensions are fixed at construction; the standard grid is 22 rows by 10
/// columns, of which the top [`GameGrid::HIDDEN_ROWS`] form the spawn buffer.
///
/// Out-of-bounds cells are never reported as empty, so collision checks treat
/// the grid edges as solid walls.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameGrid;
///
/// let grid = GameGrid::standard();
/// assert!(grid.is_empty(21, 0));
/// assert!(!grid.is_empty(22, 0));
/// assert!(!grid.is_empty(0, -1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameGrid {
    rows: usize,
    columns: usize,
    cells: Vec<u8>,
}

impl GameGrid {
    pub const STANDARD_ROWS: usize = 22;
    pub const STANDARD_COLUMNS: usize = 10;
    /// Rows at the top used to stage newly spawned blocks.
    pub const HIDDEN_ROWS: usize = 2;

    pub fn new(rows: usize, columns: usize) -> Result<Self, GridDimensionError> {
        let in_range = |n: usize| n > 0 && i32::try_from(n).is_ok();
        if !in_range(rows) || !in_range(columns) {
            return Err(GridDimensionError { rows, columns });
        }
        Ok(Self::empty(rows, columns))
    }

    /// Creates the 22×10 grid used by a regular game.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty(Self::STANDARD_ROWS, Self::STANDARD_COLUMNS)
    }

    fn empty(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![EMPTY_CELL; rows * columns],
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    fn index(&self, row: i32, column: i32) -> Option<usize> {
        let row = usize::try_from(row).ok().filter(|&r| r < self.rows)?;
        let column = usize::try_from(column).ok().filter(|&c| c < self.columns)?;
        Some(row * self.columns + column)
    }

    #[must_use]
    pub fn is_inside(&self, row: i32, column: i32) -> bool {
        self.index(row, column).is_some()
    }

    /// Returns `true` only for in-bounds cells holding no block.
    #[must_use]
    pub fn is_empty(&self, row: i32, column: i32) -> bool {
        self.get(row, column) == Some(EMPTY_CELL)
    }

    #[must_use]
    pub fn is_position_empty(&self, position: Position) -> bool {
        self.is_empty(position.row, position.column)
    }

    #[must_use]
    pub fn get(&self, row: i32, column: i32) -> Option<u8> {
        self.index(row, column).map(|i| self.cells[i])
    }

    /// Occupies a cell with `kind`, or empties it with `None`.
    ///
    /// Returns `false` when the cell is out of bounds.
    pub fn set(&mut self, row: i32, column: i32, kind: Option<BlockKind>) -> bool {
        let Some(i) = self.index(row, column) else {
            return false;
        };
        self.cells[i] = kind.map_or(EMPTY_CELL, BlockKind::id);
        true
    }

    /// Marks every tile of `block` with its kind.
    pub fn fill_block(&mut self, block: &Block) {
        for position in block.tile_positions() {
            self.set(position.row, position.column, Some(block.kind()));
        }
    }

    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row >= self.rows {
            return None;
        }
        Some(&self.cells[row * self.columns..][..self.columns])
    }

    pub fn all_rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(self.columns)
    }

    /// Rows below the spawn buffer, top to bottom.
    pub fn visible_rows(&self) -> impl Iterator<Item = &[u8]> {
        self.all_rows().skip(Self::HIDDEN_ROWS)
    }

    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.row(row)
            .is_some_and(|cells| cells.iter().all(|&c| c != EMPTY_CELL))
    }

    #[must_use]
    pub fn is_row_empty(&self, row: usize) -> bool {
        self.row(row)
            .is_some_and(|cells| cells.iter().all(|&c| c == EMPTY_CELL))
    }

    fn clear_row(&mut self, row: usize) {
        self.cells[row * self.columns..][..self.columns].fill(EMPTY_CELL);
    }

    fn move_row_down(&mut self, row: usize, count: usize) {
        let src = row * self.columns;
        let dst = (row + count) * self.columns;
        self.cells.copy_within(src..src + self.columns, dst);
        self.clear_row(row);
    }

    /// Clears filled rows and returns how many were cleared.
    ///
    /// Rows are scanned bottom to top; every non-full row above a cleared one is
    /// shifted down by the number of rows cleared so far, so a single pass both
    /// removes the rows and compacts the stack.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        for row in (0..self.rows).rev() {
            if self.is_row_full(row) {
                self.clear_row(row);
                cleared += 1;
            } else if cleared > 0 {
                self.move_row_down(row, cleared);
            }
        }
        cleared
    }

    fn cell_char(cell: u8) -> char {
        BlockKind::from_id(cell).map_or('.', BlockKind::as_char)
    }

    fn parse_row(line: &str) -> Result<Vec<u8>, char> {
        line.chars()
            .map(|c| match c {
                '.' => Ok(EMPTY_CELL),
                _ => BlockKind::from_char(c).map(BlockKind::id).ok_or(c),
            })
            .collect()
    }

    /// Builds a standard grid from ASCII art, aligned to the bottom row.
    ///
    /// `.` marks an empty cell and a kind letter (`I`, `J`, ...) an occupied one.
    #[cfg(test)]
    pub(crate) fn from_ascii(art: &str) -> Self {
        let mut grid = Self::standard();
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        assert!(lines.len() <= grid.rows, "too many rows: {}", lines.len());
        let top = grid.rows - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let cells = Self::parse_row(line).unwrap();
            assert_eq!(cells.len(), grid.columns, "row {i} has wrong width");
            grid.cells[(top + i) * grid.columns..][..grid.columns].copy_from_slice(&cells);
        }
        grid
    }
}

impl Serialize for GameGrid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Format: one string per row, e.g. ["..........", "IIII..OO.."]
        let mut seq = serializer.serialize_seq(Some(self.rows))?;
        for row in self.all_rows() {
            let line: String = row.iter().map(|&c| Self::cell_char(c)).collect();
            seq.serialize_element(&line)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for GameGrid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let lines = Vec::<String>::deserialize(deserializer)?;
        let columns = lines.first().map_or(0, |line| line.chars().count());
        let mut grid = GameGrid::new(lines.len(), columns).map_err(serde::de::Error::custom)?;

        for (i, line) in lines.iter().enumerate() {
            let cells = Self::parse_row(line)
                .map_err(|c| serde::de::Error::custom(format!("invalid cell '{c}' at row {i}")))?;
            if cells.len() != columns {
                return Err(serde::de::Error::custom(format!(
                    "expected {columns} cells at row {i}, got {}",
                    cells.len()
                )));
            }
            grid.cells[i * columns..][..columns].copy_from_slice(&cells);
        }

        Ok(grid)
    }
}
