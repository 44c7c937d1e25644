use std::path::PathBuf;

use blockfall_engine::{GameSession, GravityCurve, Intent, QueueSeed};
use rand::Rng;

use super::GravityArg;
use crate::{
    schema::record::{SessionRecord, StepRecord},
    util::Output,
};

const PROGRESS_INTERVAL: usize = 1000;

/// Relative weights of what the random player does on each step.
///
/// Lateral moves dominate so blocks spread across the grid instead of piling
/// up in the spawn columns.
const POLICY: [(Option<Intent>, u32); 8] = [
    (None, 8),
    (Some(Intent::MoveLeft), 5),
    (Some(Intent::MoveRight), 5),
    (Some(Intent::MoveDown), 2),
    (Some(Intent::RotateCw), 3),
    (Some(Intent::RotateCcw), 2),
    (Some(Intent::Hold), 1),
    (Some(Intent::HardDrop), 2),
];

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Block queue seed as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<QueueSeed>,
    /// Maximum number of steps to run before stopping
    #[arg(long, default_value_t = 10_000)]
    max_steps: usize,
    /// Simulated time between steps, in milliseconds
    #[arg(long, default_value_t = 50)]
    step_ms: u64,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    #[clap(flatten)]
    gravity: GravityArg,
}

impl SimulateArg {
    pub(crate) fn gravity(&self) -> &GravityArg {
        &self.gravity
    }
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        seed,
        max_steps,
        step_ms,
        output,
        gravity,
    } = arg;

    let gravity = gravity.to_curve()?;
    let mut rng = rand::rng();
    let seed = seed.unwrap_or_else(|| rng.random());

    eprintln!("Simulating with seed {seed}");
    let record = simulate(seed, gravity, *max_steps, *step_ms, &mut rng);

    let stats = &record.final_stats;
    eprintln!(
        "Finished after {} steps: score {}, {} blocks placed, {}",
        record.steps.len(),
        stats.score(),
        stats.placed_blocks(),
        if record.game_over {
            "game over"
        } else {
            "still playing"
        },
    );

    Output::save_json(&record, output.clone())?;
    Ok(())
}

/// Plays a seeded session with random intents until the game ends or
/// `max_steps` steps have run.
pub(crate) fn simulate<R>(
    seed: QueueSeed,
    gravity: GravityCurve,
    max_steps: usize,
    step_ms: u64,
    rng: &mut R,
) -> SessionRecord
where
    R: Rng,
{
    let mut session = GameSession::with_seed(gravity, seed);
    let mut steps = Vec::new();

    while steps.len() < max_steps && !session.state().is_game_over() {
        let step = StepRecord {
            elapsed_ms: step_ms,
            intent: choose_intent(rng),
        };
        step.run(&mut session);
        steps.push(step);

        if steps.len() % PROGRESS_INTERVAL == 0 {
            eprintln!(
                "Step {}: score {}, elapsed {:?}",
                steps.len(),
                session.state().score(),
                session.elapsed()
            );
        }
    }

    SessionRecord::capture(&session, steps)
}

fn choose_intent<R>(rng: &mut R) -> Option<Intent>
where
    R: Rng,
{
    let total: u32 = POLICY.iter().map(|(_, weight)| weight).sum();
    let mut pick = rng.random_range(0..total);
    for (intent, weight) in POLICY {
        if pick < weight {
            return intent;
        }
        pick -= weight;
    }
    None
}
