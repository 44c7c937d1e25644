pub use self::{block::*, game_grid::*, position::*};

pub(crate) mod block;
pub(crate) mod game_grid;
pub(crate) mod position;
