use std::time::Duration;

use blockfall_engine::{GameGrid, GameSession, GameStats, GravityCurve, Intent, QueueSeed};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recorded headless session with everything needed to replay it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Timestamp when recording was created (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    /// Random seed used for block generation
    pub seed: QueueSeed,
    /// Gravity timing the session ran with
    pub gravity: GravityCurve,
    /// Clock advances and intents, in the order they were fed to the session
    pub steps: Vec<StepRecord>,
    /// Statistics when the recording stopped
    pub final_stats: GameStats,
    /// Whether the game had ended when the recording stopped
    pub game_over: bool,
    /// Settled cells when the recording stopped, top row first
    pub final_grid: GameGrid,
}

/// One step of a session: advance the clock, then deliver an optional intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
}

impl StepRecord {
    pub fn run(&self, session: &mut GameSession) {
        session.advance(Duration::from_millis(self.elapsed_ms));
        if let Some(intent) = self.intent
            && !session.state().is_game_over()
        {
            session.apply(intent);
        }
    }
}

impl SessionRecord {
    /// Captures the end state of `session` together with the steps that led to it.
    pub fn capture(session: &GameSession, steps: Vec<StepRecord>) -> Self {
        let state = session.state();
        Self {
            recorded_at: Utc::now(),
            seed: state.seed(),
            gravity: *session.gravity(),
            steps,
            final_stats: state.stats().clone(),
            game_over: state.is_game_over(),
            final_grid: state.grid().clone(),
        }
    }
}
