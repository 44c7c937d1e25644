/// A cell coordinate on the grid.
///
/// Rows grow downward from the top of the spawn buffer, columns grow rightward.
/// Coordinates are signed because block offsets may sit above or left of the grid
/// while tile positions are being computed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::Add)]
pub struct Position {
    pub row: i32,
    pub column: i32,
}

impl Position {
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    #[must_use]
    pub const fn offset_by(self, rows: i32, columns: i32) -> Self {
        Self {
            row: self.row + rows,
            column: self.column + columns,
        }
    }
}
