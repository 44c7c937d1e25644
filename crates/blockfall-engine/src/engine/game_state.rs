use std::mem;

use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::{
    BlockCollisionError,
    core::{
        block::{Block, BlockKind},
        game_grid::GameGrid,
    },
};

use super::{
    block_queue::{BlockQueue, QueueSeed},
    game_stats::GameStats,
    intent::Intent,
};

/// Rows a freshly spawned block is nudged down, when there is room.
const SPAWN_NUDGE_ROWS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Outcome of a block coming to rest on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: BlockKind,
    pub cleared_rows: usize,
    pub game_over: bool,
}

/// Complete state of a single game.
///
/// Owns the grid, the block queue, the current block, and the optional held
/// block. Every intent is attempted and then reverted if the resulting
/// placement leaves the grid or overlaps an occupied cell, so illegal input is
/// silently ignored rather than reported.
///
/// Once the state reaches [`GameStatus::GameOver`] it never leaves it, and all
/// intents become no-ops.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameState;
///
/// let mut state = GameState::new();
///
/// state.move_block_left();
/// state.rotate_block_cw();
/// let ghost = state.ghost_block();
///
/// if let Some(placement) = state.drop_block() {
///     println!("cleared {} rows", placement.cleared_rows);
/// }
/// assert!(state.score() <= 4);
/// # let _ = ghost;
/// ```
#[derive(Debug, Clone)]
pub struct GameState {
    grid: GameGrid,
    queue: BlockQueue,
    current: Block,
    held: Option<Block>,
    stats: GameStats,
    status: GameStatus,
    can_hold: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for the block queue.
    #[must_use]
    pub fn with_seed(seed: QueueSeed) -> Self {
        let mut queue = BlockQueue::with_seed(seed);
        let current = queue.get_and_update();
        let mut this = Self {
            grid: GameGrid::standard(),
            queue,
            current,
            held: None,
            stats: GameStats::new(),
            status: GameStatus::Playing,
            can_hold: true,
        };
        this.settle_current_block();
        this
    }

    #[must_use]
    pub fn grid(&self) -> &GameGrid {
        &self.grid
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut GameGrid {
        &mut self.grid
    }

    #[must_use]
    pub fn current_block(&self) -> &Block {
        &self.current
    }

    #[must_use]
    pub fn held_block(&self) -> Option<BlockKind> {
        self.held.as_ref().map(Block::kind)
    }

    #[must_use]
    pub fn next_block(&self) -> BlockKind {
        self.queue.next_block()
    }

    #[must_use]
    pub fn seed(&self) -> QueueSeed {
        self.queue.seed()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// Replaces the current block if it fits on the grid.
    pub fn set_current_block(&mut self, block: Block) -> Result<(), BlockCollisionError> {
        if !self.fits(&block) {
            return Err(BlockCollisionError);
        }
        self.current = block;
        Ok(())
    }

    fn fits(&self, block: &Block) -> bool {
        block
            .tile_positions()
            .all(|position| self.grid.is_position_empty(position))
    }

    fn current_fits(&self) -> bool {
        self.fits(&self.current)
    }

    /// Applies `change` to the current block, undoing it with `revert` if the
    /// result does not fit. Returns whether the change was kept.
    fn try_change(&mut self, change: fn(&mut Block), revert: fn(&mut Block)) -> bool {
        if self.is_game_over() {
            return false;
        }
        change(&mut self.current);
        if self.current_fits() {
            return true;
        }
        revert(&mut self.current);
        false
    }

    /// Resets the current block to its spawn state and nudges it down.
    fn settle_current_block(&mut self) {
        self.current.reset();
        for _ in 0..SPAWN_NUDGE_ROWS {
            self.current.move_by(1, 0);
            if !self.current_fits() {
                self.current.move_by(-1, 0);
            }
        }
    }

    /// Makes `block` the current block in its spawn position and returns the
    /// block it replaces.
    fn spawn_block(&mut self, block: Block) -> Block {
        let previous = mem::replace(&mut self.current, block);
        self.settle_current_block();
        previous
    }

    pub fn move_block_left(&mut self) -> bool {
        self.try_change(|b| b.move_by(0, -1), |b| b.move_by(0, 1))
    }

    pub fn move_block_right(&mut self) -> bool {
        self.try_change(|b| b.move_by(0, 1), |b| b.move_by(0, -1))
    }

    pub fn rotate_block_cw(&mut self) -> bool {
        self.try_change(Block::rotate_cw, Block::rotate_ccw)
    }

    pub fn rotate_block_ccw(&mut self) -> bool {
        self.try_change(Block::rotate_ccw, Block::rotate_cw)
    }

    /// Sets the current block aside, or swaps it with the held one.
    ///
    /// Allowed once per placement: returns `false` without changing anything if
    /// hold was already used since the last block was placed.
    pub fn hold_block(&mut self) -> bool {
        if self.is_game_over() || !self.can_hold {
            return false;
        }
        let incoming = match self.held.take() {
            Some(held) => held,
            None => self.queue.get_and_update(),
        };
        let outgoing = self.spawn_block(incoming);
        self.held = Some(outgoing);
        self.can_hold = false;
        true
    }

    /// Moves the current block down one row, placing it if it cannot move.
    ///
    /// Returns the placement when the block came to rest, `None` when it moved
    /// (or when the game is already over).
    pub fn move_block_down(&mut self) -> Option<Placement> {
        if self.is_game_over() {
            return None;
        }
        self.current.move_by(1, 0);
        if self.current_fits() {
            return None;
        }
        self.current.move_by(-1, 0);
        Some(self.place_block())
    }

    fn tile_drop_distance(&self, row: i32, column: i32) -> i32 {
        let mut drop = 0;
        while self.grid.is_empty(row + drop + 1, column) {
            drop += 1;
        }
        drop
    }

    /// Number of rows the current block can fall before it is blocked.
    #[must_use]
    pub fn block_drop_distance(&self) -> usize {
        self.current
            .tile_positions()
            .map(|p| self.tile_drop_distance(p.row, p.column))
            .min()
            .and_then(|drop| usize::try_from(drop).ok())
            .unwrap_or(0)
    }

    fn block_drop_rows(&self) -> i32 {
        i32::try_from(self.block_drop_distance()).unwrap_or(0)
    }

    /// The current block moved to where a hard drop would leave it.
    #[must_use]
    pub fn ghost_block(&self) -> Block {
        let mut ghost = self.current.clone();
        ghost.move_by(self.block_drop_rows(), 0);
        ghost
    }

    /// Drops the current block as far as it goes and places it.
    pub fn drop_block(&mut self) -> Option<Placement> {
        if self.is_game_over() {
            return None;
        }
        let rows = self.block_drop_rows();
        self.current.move_by(rows, 0);
        Some(self.place_block())
    }

    /// Dispatches a shell intent. Returns the placement if one happened.
    pub fn apply(&mut self, intent: Intent) -> Option<Placement> {
        match intent {
            Intent::MoveLeft => {
                self.move_block_left();
                None
            }
            Intent::MoveRight => {
                self.move_block_right();
                None
            }
            Intent::RotateCw => {
                self.rotate_block_cw();
                None
            }
            Intent::RotateCcw => {
                self.rotate_block_ccw();
                None
            }
            Intent::Hold => {
                self.hold_block();
                None
            }
            Intent::MoveDown => self.move_block_down(),
            Intent::HardDrop => self.drop_block(),
        }
    }

    fn spawn_buffer_occupied(&self) -> bool {
        (0..GameGrid::HIDDEN_ROWS).any(|row| !self.grid.is_row_empty(row))
    }

    fn place_block(&mut self) -> Placement {
        let kind = self.current.kind();
        self.grid.fill_block(&self.current);
        let cleared_rows = self.grid.clear_full_rows();
        self.stats.complete_placement(cleared_rows);

        if self.spawn_buffer_occupied() {
            self.status = GameStatus::GameOver;
        } else {
            let next = self.queue.get_and_update();
            self.spawn_block(next);
            self.can_hold = true;
        }

        Placement {
            kind,
            cleared_rows,
            game_over: self.is_game_over(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    const SEED: QueueSeed = QueueSeed::from_u128(0x0f1e_2d3c_4b5a_6978_8796_a5b4_c3d2_e1f0);

    fn state() -> GameState {
        GameState::with_seed(SEED)
    }

    fn block_at(kind: BlockKind, rows: i32, columns: i32) -> Block {
        let mut block = Block::new(kind);
        block.move_by(rows, columns);
        block
    }

    fn tiles(block: &Block) -> Vec<Position> {
        block.tile_positions().collect()
    }

    #[test]
    fn test_new_state() {
        let state = state();
        assert!(state.status().is_playing());
        assert!(state.can_hold());
        assert_eq!(state.held_block(), None);
        assert_eq!(state.score(), 0);
        assert_eq!(state.grid(), &GameGrid::standard());
        assert_ne!(state.next_block(), state.current_block().kind());
    }

    #[test]
    fn test_spawned_block_is_nudged_down_twice() {
        let state = state();
        let block = state.current_block();
        assert_eq!(block.rotation(), 0);
        assert_eq!(block.offset(), block.kind().start_offset().offset_by(2, 0));
    }

    #[test]
    fn test_spawn_nudge_reverts_when_blocked() {
        let mut state = state();
        // O spawns on rows 0-1, columns 4-5. Block the second nudge.
        state.grid.set(3, 4, Some(BlockKind::T));
        state.spawn_block(Block::new(BlockKind::O));
        assert_eq!(state.current_block().offset(), Position::new(1, 4));
    }

    #[test]
    fn test_i_block_falls_to_floor() {
        let mut state = state();
        state.set_current_block(Block::new(BlockKind::I)).unwrap();
        assert_eq!(
            tiles(state.current_block()),
            (3..=6).map(|c| Position::new(0, c)).collect::<Vec<_>>()
        );
        assert_eq!(state.block_drop_distance(), 21);

        for step in 0..21 {
            assert_eq!(state.move_block_down(), None, "step {step}");
        }
        assert_eq!(state.block_drop_distance(), 0);
        assert_eq!(
            tiles(state.current_block()),
            (3..=6).map(|c| Position::new(21, c)).collect::<Vec<_>>()
        );

        let placement = state.move_block_down().unwrap();
        assert_eq!(
            placement,
            Placement {
                kind: BlockKind::I,
                cleared_rows: 0,
                game_over: false,
            }
        );
        assert_eq!(
            state.grid().row(21),
            Some(&[0, 0, 0, 1, 1, 1, 1, 0, 0, 0][..])
        );
        assert_eq!(state.stats().placed_blocks(), 1);
    }

    #[test]
    fn test_drop_distance_stops_at_highest_obstacle() {
        let mut state = state();
        state.grid = GameGrid::from_ascii(
            "
            .....Z....
            ..........
            ..........
            ",
        );
        state.set_current_block(Block::new(BlockKind::I)).unwrap();
        // Column 5 is blocked at row 19, so the block rests on row 18.
        assert_eq!(state.block_drop_distance(), 18);

        let ghost = state.ghost_block();
        assert_eq!(
            tiles(&ghost),
            (3..=6).map(|c| Position::new(18, c)).collect::<Vec<_>>()
        );
        assert_eq!(state.current_block().offset(), Position::new(-1, 3));
    }

    #[test]
    fn test_drop_clears_completed_row() {
        let mut state = state();
        state.grid = GameGrid::from_ascii(".ZZZZZZZZZ");

        let mut vertical_i = block_at(BlockKind::I, 1, -5);
        vertical_i.rotate_cw();
        state.set_current_block(vertical_i).unwrap();
        assert_eq!(
            tiles(state.current_block()),
            (0..4).map(|r| Position::new(r, 0)).collect::<Vec<_>>()
        );

        let placement = state.drop_block().unwrap();
        assert_eq!(placement.cleared_rows, 1);
        assert!(!placement.game_over);
        assert_eq!(state.score(), 1);
        assert_eq!(state.stats().row_cleared_counter()[1], 1);

        let expected = GameGrid::from_ascii(
            "
            I.........
            I.........
            I.........
            ",
        );
        assert_eq!(state.grid(), &expected);
    }

    #[test]
    fn test_multi_row_clear_scores_one_point_per_row() {
        let mut state = state();
        state.grid = GameGrid::from_ascii(
            "
            .ZZZZZZZZZ
            .ZZZZZZZZZ
            .ZZZZZZZZZ
            .ZZZZZZZZZ
            ",
        );
        let mut vertical_i = block_at(BlockKind::I, 1, -5);
        vertical_i.rotate_cw();
        state.set_current_block(vertical_i).unwrap();

        let placement = state.drop_block().unwrap();
        assert_eq!(placement.cleared_rows, 4);
        assert_eq!(state.score(), 4);
        assert_eq!(state.grid(), &GameGrid::standard());
    }

    #[test]
    fn test_moves_revert_at_walls() {
        let mut state = state();
        state.set_current_block(block_at(BlockKind::O, 5, 0)).unwrap();

        let mut moved = 0;
        while state.move_block_left() {
            moved += 1;
        }
        assert_eq!(moved, 4);
        let before = state.current_block().clone();
        assert!(!state.move_block_left());
        assert_eq!(state.current_block(), &before);

        while state.move_block_right() {}
        assert_eq!(state.current_block().offset(), Position::new(5, 8));
        assert!(!state.move_block_right());
    }

    #[test]
    fn test_moves_revert_on_occupied_cell() {
        let mut state = state();
        state.grid.set(6, 3, Some(BlockKind::S));
        state.set_current_block(block_at(BlockKind::O, 5, 0)).unwrap();

        let before = state.current_block().clone();
        assert!(!state.move_block_left());
        assert_eq!(state.current_block(), &before);
        assert!(state.move_block_right());
    }

    #[test]
    fn test_rotation_reverts_when_blocked() {
        let mut state = state();
        // Horizontal I lying on the floor; the vertical layout would poke out.
        state.set_current_block(block_at(BlockKind::I, 21, 0)).unwrap();
        let before = state.current_block().clone();

        assert!(!state.rotate_block_cw());
        assert_eq!(state.current_block(), &before);
        assert!(!state.rotate_block_ccw());
        assert_eq!(state.current_block(), &before);
    }

    #[test]
    fn test_rotation_reverts_on_occupied_cell() {
        let mut state = state();
        // T pointing up at rows 8-9; both vertical layouts need (10, 4).
        state.set_current_block(block_at(BlockKind::T, 8, 0)).unwrap();
        state.grid.set(10, 4, Some(BlockKind::Z));
        let before = state.current_block().clone();

        assert!(!state.rotate_block_cw());
        assert_eq!(state.current_block(), &before);
        assert!(!state.rotate_block_ccw());
        assert_eq!(state.current_block(), &before);

        state.grid.set(10, 4, None);
        assert!(state.rotate_block_cw());
        assert_eq!(state.current_block().rotation(), 1);
    }

    #[test]
    fn test_rotation_round_trip_in_open_space() {
        let mut state = state();
        state.set_current_block(block_at(BlockKind::T, 8, 0)).unwrap();
        let before = state.current_block().clone();
        for _ in 0..3 {
            assert!(state.rotate_block_cw());
        }
        for _ in 0..3 {
            assert!(state.rotate_block_ccw());
        }
        assert_eq!(state.current_block(), &before);
    }

    #[test]
    fn test_hold_once_per_placement() {
        let mut state = state();
        let first = state.current_block().kind();
        let second = state.next_block();

        assert!(state.hold_block());
        assert!(!state.can_hold());
        assert_eq!(state.held_block(), Some(first));
        assert_eq!(state.current_block().kind(), second);
        assert_eq!(
            state.current_block().offset(),
            second.start_offset().offset_by(2, 0)
        );

        // Further holds, moves, and rotations leave the flag alone.
        assert!(!state.hold_block());
        state.move_block_left();
        state.rotate_block_cw();
        assert!(!state.can_hold());
        assert_eq!(state.held_block(), Some(first));

        state.drop_block().unwrap();
        assert!(state.can_hold());

        let third = state.current_block().kind();
        assert!(state.hold_block());
        assert_eq!(state.current_block().kind(), first);
        assert_eq!(state.held_block(), Some(third));
        assert_eq!(
            state.current_block().offset(),
            first.start_offset().offset_by(2, 0),
            "held block comes back in spawn position"
        );
    }

    #[test]
    fn test_soft_drop_does_not_reset_hold() {
        let mut state = state();
        assert!(state.hold_block());
        assert_eq!(state.move_block_down(), None);
        assert!(!state.can_hold());
    }

    #[test]
    fn test_game_over_when_block_rests_in_spawn_buffer() {
        let mut state = state();
        for row in 2..22 {
            state.grid.set(row, 0, Some(BlockKind::J));
        }
        state.set_current_block(block_at(BlockKind::O, 0, -4)).unwrap();
        let next = state.next_block();

        let placement = state.drop_block().unwrap();
        assert!(placement.game_over);
        assert_eq!(placement.cleared_rows, 0);
        assert!(state.is_game_over());
        assert_eq!(state.current_block().kind(), BlockKind::O);
        assert_eq!(
            state.next_block(),
            next,
            "no block is dequeued after game over"
        );
        assert_eq!(state.grid().get(1, 1), Some(BlockKind::O.id()));
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = state();
        state.grid.set(1, 9, Some(BlockKind::L));
        let placement = state.drop_block().unwrap();
        assert!(placement.game_over);

        let grid = state.grid().clone();
        let current = state.current_block().clone();
        for intent in Intent::ALL {
            assert_eq!(state.apply(intent), None, "{intent}");
        }
        assert!(!state.hold_block());
        assert!(state.is_game_over());
        assert_eq!(state.grid(), &grid);
        assert_eq!(state.current_block(), &current);
    }

    #[test]
    fn test_set_current_block_rejects_collisions() {
        let mut state = state();
        state.grid.set(10, 4, Some(BlockKind::T));
        let before = state.current_block().clone();

        let overlapping = block_at(BlockKind::O, 10, 0);
        assert!(state.set_current_block(overlapping).is_err());
        let outside = block_at(BlockKind::O, 0, 10);
        assert!(state.set_current_block(outside).is_err());
        assert_eq!(state.current_block(), &before);
    }

    #[test]
    fn test_apply_dispatches_intents() {
        let mut state = state();
        state.set_current_block(block_at(BlockKind::T, 4, 0)).unwrap();

        assert_eq!(state.apply(Intent::MoveRight), None);
        assert_eq!(state.current_block().offset(), Position::new(4, 4));
        assert_eq!(state.apply(Intent::RotateCw), None);
        assert_eq!(state.current_block().rotation(), 1);
        assert_eq!(state.apply(Intent::MoveDown), None);
        assert_eq!(state.current_block().offset(), Position::new(5, 4));

        let placement = state.apply(Intent::HardDrop).unwrap();
        assert_eq!(placement.kind, BlockKind::T);
        assert_eq!(state.stats().placed_blocks(), 1);
    }

    #[test]
    fn test_seeded_games_are_identical() {
        let script = [
            Intent::MoveLeft,
            Intent::RotateCw,
            Intent::HardDrop,
            Intent::Hold,
            Intent::MoveRight,
            Intent::MoveRight,
            Intent::HardDrop,
            Intent::RotateCcw,
            Intent::HardDrop,
        ];
        let mut a = state();
        let mut b = state();
        for intent in script {
            assert_eq!(a.apply(intent), b.apply(intent));
        }
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.current_block(), b.current_block());
        assert_eq!(a.held_block(), b.held_block());
    }
}
