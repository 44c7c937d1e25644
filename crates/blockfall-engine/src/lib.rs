pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("block colliding when setting current block")]
pub struct BlockCollisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("grid dimensions must be positive, got {rows}x{columns}")]
pub struct GridDimensionError {
    pub rows: usize,
    pub columns: usize,
}
