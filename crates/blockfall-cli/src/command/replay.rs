use std::path::PathBuf;

use anyhow::ensure;
use blockfall_engine::GameSession;

use super::check_gravity;
use crate::{schema::record::SessionRecord, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Path to the recording file (JSON format)
    recording_file: PathBuf,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let ReplayArg { recording_file } = arg;

    eprintln!("Loading recording from {}", recording_file.display());
    let record = util::read_record_file(recording_file)?;
    eprintln!(
        "Loaded {} steps recorded at {} with seed {}",
        record.steps.len(),
        record.recorded_at,
        record.seed
    );

    let session = verify(&record)?;
    eprintln!(
        "Replay matches: score {} after {:?} and {} gravity ticks",
        session.state().score(),
        session.elapsed(),
        session.tick_count()
    );
    Ok(())
}

/// Re-runs the recorded steps on a fresh session and checks the outcome
/// against the recording.
pub(crate) fn verify(record: &SessionRecord) -> anyhow::Result<GameSession> {
    check_gravity(&record.gravity)?;
    let mut session = GameSession::with_seed(record.gravity, record.seed);
    for step in &record.steps {
        step.run(&mut session);
    }

    let state = session.state();
    ensure!(
        state.stats() == &record.final_stats,
        "final stats differ: replayed {:?}, recorded {:?}",
        state.stats(),
        record.final_stats
    );
    ensure!(
        state.is_game_over() == record.game_over,
        "game over flag differs: replayed {}, recorded {}",
        state.is_game_over(),
        record.game_over
    );
    ensure!(
        state.grid() == &record.final_grid,
        "final grid differs from the recording"
    );
    Ok(session)
}
