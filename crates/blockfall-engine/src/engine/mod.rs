//! Game rules and state management.
//!
//! This module builds gameplay on top of the grid and block types in
//! [`crate::core`]:
//!
//! - [`BlockQueue`] - Seeded generator of upcoming blocks (no immediate repeats)
//! - [`GameState`] - Grid, current/held block, hold rule, placement, game over
//! - [`GameStats`] - Score, placed blocks, and row clear histogram
//! - [`GravityCurve`] - Gravity tick delay as a function of score
//! - [`GameSession`] - [`GameState`] driven by elapsed time and intents
//! - [`Intent`] - Player requests forwarded by the shell
//!
//! # Game Flow
//!
//! 1. Create a [`GameState`] (or a [`GameSession`] around one) with a seed
//! 2. Forward player intents: move, rotate, hold, soft or hard drop
//! 3. A block that cannot move down is placed; full rows are cleared and scored
//! 4. The next block spawns, unless the placed block reached the spawn buffer
//! 5. Repeat until [`GameStatus::GameOver`]
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{GameState, QueueSeed};
//!
//! let mut state = GameState::with_seed(QueueSeed::from_u128(7));
//!
//! state.move_block_right();
//! state.rotate_block_ccw();
//! let landing = state.ghost_block();
//!
//! let placement = state.drop_block().unwrap();
//! assert_eq!(placement.cleared_rows, 0);
//! assert!(!state.is_game_over());
//! # let _ = landing;
//! ```

pub use self::{
    block_queue::*, game_session::*, game_state::*, game_stats::*, gravity::*, intent::*,
};

mod block_queue;
mod game_session;
mod game_state;
mod game_stats;
mod gravity;
mod intent;
