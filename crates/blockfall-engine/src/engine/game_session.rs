use std::time::Duration;

use super::{
    block_queue::QueueSeed,
    game_state::{GameState, Placement},
    gravity::GravityCurve,
    intent::Intent,
};

/// A game driven by gravity ticks interleaved with player intents.
///
/// The session has no clock of its own: the shell reports elapsed time through
/// [`GameSession::advance`], and the session runs every gravity tick that has
/// come due. The tick delay is recomputed from the score after each tick.
/// All mutation goes through `&mut self`, so the state is only ever touched
/// from the task that owns the session.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use blockfall_engine::{GameSession, GravityCurve, Intent};
///
/// let mut session = GameSession::new(GravityCurve::default());
/// session.apply(Intent::MoveLeft);
/// session.advance(Duration::from_millis(2500));
/// assert_eq!(session.tick_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    state: GameState,
    gravity: GravityCurve,
    since_last_tick: Duration,
    elapsed: Duration,
    tick_count: usize,
}

impl GameSession {
    #[must_use]
    pub fn new(gravity: GravityCurve) -> Self {
        Self::from_state(GameState::new(), gravity)
    }

    #[must_use]
    pub fn with_seed(gravity: GravityCurve, seed: QueueSeed) -> Self {
        Self::from_state(GameState::with_seed(seed), gravity)
    }

    #[must_use]
    pub fn from_state(state: GameState, gravity: GravityCurve) -> Self {
        Self {
            state,
            gravity,
            since_last_tick: Duration::ZERO,
            elapsed: Duration::ZERO,
            tick_count: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn gravity(&self) -> &GravityCurve {
        &self.gravity
    }

    /// Total time reported through [`Self::advance`] while the game was running.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of gravity ticks run so far.
    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.tick_count
    }

    /// Delay until the next gravity tick at the current score.
    #[must_use]
    pub fn current_delay(&self) -> Duration {
        self.gravity.delay_for_score(self.state.score())
    }

    pub fn apply(&mut self, intent: Intent) -> Option<Placement> {
        self.state.apply(intent)
    }

    /// Advances the clock and runs every gravity tick that has come due.
    ///
    /// Returns the placements caused by gravity, oldest first. Time stops
    /// accumulating once the game is over, and the clock saturates instead of
    /// overflowing.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Placement> {
        let mut placements = Vec::new();
        if self.state.is_game_over() {
            return placements;
        }
        self.elapsed = self.elapsed.saturating_add(elapsed);
        self.since_last_tick = self.since_last_tick.saturating_add(elapsed);

        while !self.state.is_game_over() {
            let delay = self.current_delay();
            if self.since_last_tick < delay {
                break;
            }
            self.since_last_tick -= delay;
            self.tick_count += 1;
            placements.extend(self.state.move_block_down());
        }
        placements
    }
}
