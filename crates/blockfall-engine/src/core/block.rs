use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

use super::position::Position;

/// The seven tetromino variants.
///
/// The discriminant doubles as the grid occupancy marker, so `0` is left free
/// to mean "empty cell".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum BlockKind {
    I = 1,
    J = 2,
    L = 3,
    O = 4,
    S = 5,
    T = 6,
    Z = 7,
}

impl Distribution<BlockKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BlockKind {
        BlockKind::ALL[rng.random_range(0..BlockKind::LEN)]
    }
}

impl BlockKind {
    /// Number of block kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        BlockKind::I,
        BlockKind::J,
        BlockKind::L,
        BlockKind::O,
        BlockKind::S,
        BlockKind::T,
        BlockKind::Z,
    ];

    /// Returns the grid marker for this kind, in `1..=7`.
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(BlockKind::I),
            2 => Some(BlockKind::J),
            3 => Some(BlockKind::L),
            4 => Some(BlockKind::O),
            5 => Some(BlockKind::S),
            6 => Some(BlockKind::T),
            7 => Some(BlockKind::Z),
            _ => None,
        }
    }

    /// Returns the single character representation of this block kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::BlockKind;
    ///
    /// assert_eq!(BlockKind::I.as_char(), 'I');
    /// assert_eq!(BlockKind::Z.as_char(), 'Z');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            BlockKind::I => 'I',
            BlockKind::J => 'J',
            BlockKind::L => 'L',
            BlockKind::O => 'O',
            BlockKind::S => 'S',
            BlockKind::T => 'T',
            BlockKind::Z => 'Z',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(BlockKind::I),
            'J' => Some(BlockKind::J),
            'L' => Some(BlockKind::L),
            'O' => Some(BlockKind::O),
            'S' => Some(BlockKind::S),
            'T' => Some(BlockKind::T),
            'Z' => Some(BlockKind::Z),
            _ => None,
        }
    }

    /// Rotation layouts, in clockwise order starting from the spawn orientation.
    #[must_use]
    pub fn layouts(self) -> &'static [Layout] {
        match self {
            BlockKind::I => &I_LAYOUTS,
            BlockKind::J => &J_LAYOUTS,
            BlockKind::L => &L_LAYOUTS,
            BlockKind::O => &O_LAYOUTS,
            BlockKind::S => &S_LAYOUTS,
            BlockKind::T => &T_LAYOUTS,
            BlockKind::Z => &Z_LAYOUTS,
        }
    }

    /// Offset applied to every layout when the block (re)spawns.
    #[must_use]
    pub const fn start_offset(self) -> Position {
        match self {
            BlockKind::I => Position::new(-1, 3),
            BlockKind::O => Position::new(0, 4),
            BlockKind::J | BlockKind::L | BlockKind::S | BlockKind::T | BlockKind::Z => {
                Position::new(0, 3)
            }
        }
    }
}

/// Four tile positions relative to a block's offset.
pub type Layout = [Position; 4];

const fn layout(cells: [(i32, i32); 4]) -> Layout {
    let mut out = [Position::new(0, 0); 4];
    let mut i = 0;
    while i < 4 {
        out[i] = Position::new(cells[i].0, cells[i].1);
        i += 1;
    }
    out
}

const I_LAYOUTS: [Layout; 4] = [
    layout([(1, 0), (1, 1), (1, 2), (1, 3)]),
    layout([(0, 2), (1, 2), (2, 2), (3, 2)]),
    layout([(2, 0), (2, 1), (2, 2), (2, 3)]),
    layout([(0, 1), (1, 1), (2, 1), (3, 1)]),
];

const J_LAYOUTS: [Layout; 4] = [
    layout([(0, 0), (1, 0), (1, 1), (1, 2)]),
    layout([(0, 1), (0, 2), (1, 1), (2, 1)]),
    layout([(1, 0), (1, 1), (1, 2), (2, 2)]),
    layout([(0, 1), (1, 1), (2, 1), (2, 0)]),
];

const L_LAYOUTS: [Layout; 4] = [
    layout([(0, 2), (1, 0), (1, 1), (1, 2)]),
    layout([(0, 1), (1, 1), (2, 1), (2, 2)]),
    layout([(1, 0), (1, 1), (1, 2), (2, 0)]),
    layout([(0, 0), (0, 1), (1, 1), (2, 1)]),
];

const O_LAYOUTS: [Layout; 1] = [layout([(0, 0), (0, 1), (1, 0), (1, 1)])];

const S_LAYOUTS: [Layout; 4] = [
    layout([(0, 1), (0, 2), (1, 0), (1, 1)]),
    layout([(0, 1), (1, 1), (1, 2), (2, 2)]),
    layout([(1, 1), (1, 2), (2, 0), (2, 1)]),
    layout([(0, 0), (1, 0), (1, 1), (2, 1)]),
];

const T_LAYOUTS: [Layout; 4] = [
    layout([(0, 1), (1, 0), (1, 1), (1, 2)]),
    layout([(0, 1), (1, 1), (1, 2), (2, 1)]),
    layout([(1, 0), (1, 1), (1, 2), (2, 1)]),
    layout([(0, 1), (1, 0), (1, 1), (2, 1)]),
];

const Z_LAYOUTS: [Layout; 4] = [
    layout([(0, 0), (0, 1), (1, 1), (1, 2)]),
    layout([(0, 2), (1, 1), (1, 2), (2, 1)]),
    layout([(1, 0), (1, 1), (2, 1), (2, 2)]),
    layout([(0, 1), (1, 0), (1, 1), (2, 0)]),
];

/// A tetromino with its current rotation and offset.
///
/// `Block` is purely geometric: it never checks itself against a grid. Moving or
/// rotating always succeeds, and the owner is expected to validate the result
/// and undo the change if it does not fit.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Block, BlockKind, Position};
///
/// let mut block = Block::new(BlockKind::I);
/// block.move_by(1, 0);
/// block.rotate_cw();
/// let tiles: Vec<Position> = block.tile_positions().collect();
/// assert_eq!(tiles.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    kind: BlockKind,
    rotation: usize,
    offset: Position,
}

impl Block {
    #[must_use]
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            rotation: 0,
            offset: kind.start_offset(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    #[must_use]
    pub fn id(&self) -> u8 {
        self.kind.id()
    }

    /// Index into [`BlockKind::layouts`], always below the layout count.
    #[must_use]
    pub fn rotation(&self) -> usize {
        self.rotation
    }

    #[must_use]
    pub fn offset(&self) -> Position {
        self.offset
    }

    /// Absolute positions of the four tiles, computed from the current state.
    pub fn tile_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.kind.layouts()[self.rotation]
            .iter()
            .map(move |&tile| tile + self.offset)
    }

    pub fn rotate_cw(&mut self) {
        self.rotation = (self.rotation + 1) % self.kind.layouts().len();
    }

    pub fn rotate_ccw(&mut self) {
        let count = self.kind.layouts().len();
        self.rotation = (self.rotation + count - 1) % count;
    }

    pub fn move_by(&mut self, rows: i32, columns: i32) {
        self.offset = self.offset.offset_by(rows, columns);
    }

    /// Restores the spawn rotation and offset.
    pub fn reset(&mut self) {
        self.rotation = 0;
        self.offset = self.kind.start_offset();
    }
}
