use serde::{Deserialize, Serialize};

/// Game statistics tracking score, rows cleared, and placed blocks.
///
/// # Scoring
///
/// Scoring is linear: every cleared row is worth one point, regardless of how
/// many rows a single placement clears. There are no multi-row, combo, or
/// back-to-back bonuses.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_placement(4);
/// stats.complete_placement(1);
///
/// assert_eq!(stats.score(), 5);
/// assert_eq!(stats.placed_blocks(), 2);
/// assert_eq!(stats.row_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: usize,
    placed_blocks: usize,
    total_cleared_rows: usize,
    row_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            placed_blocks: 0,
            total_cleared_rows: 0,
            row_cleared_counter: [0; 5],
        }
    }

    /// Returns the current score (one point per cleared row).
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the number of blocks that have been placed on the grid.
    #[must_use]
    pub const fn placed_blocks(&self) -> usize {
        self.placed_blocks
    }

    #[must_use]
    pub const fn total_cleared_rows(&self) -> usize {
        self.total_cleared_rows
    }

    /// Returns a histogram of placements by rows cleared.
    ///
    /// Index `n` counts placements that cleared exactly `n` rows.
    #[must_use]
    pub const fn row_cleared_counter(&self) -> &[usize; 5] {
        &self.row_cleared_counter
    }

    /// Updates statistics after a block has been placed.
    pub const fn complete_placement(&mut self, cleared_rows: usize) {
        self.placed_blocks += 1;
        self.total_cleared_rows += cleared_rows;
        if cleared_rows < self.row_cleared_counter.len() {
            self.row_cleared_counter[cleared_rows] += 1;
        }
        self.score += cleared_rows;
    }
}
