use std::time::Duration;

use blockfall_engine::GravityCurve;
use clap::{Parser, Subcommand};

use self::{replay::ReplayArg, simulate::SimulateArg};

mod replay;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a seeded headless game with random intents and record it
    Simulate(#[clap(flatten)] SimulateArg),
    /// Re-run a recorded game and check that it ends the same way
    Replay(#[clap(flatten)] ReplayArg),
}

/// Gravity timing flags shared by commands that create a session.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GravityArg {
    /// Delay between gravity ticks at score 0, in milliseconds
    #[arg(long, default_value_t = 1000)]
    max_delay_ms: u64,
    /// Shortest delay between gravity ticks, in milliseconds
    #[arg(long, default_value_t = 75)]
    min_delay_ms: u64,
    /// Delay reduction per point of score, in milliseconds
    #[arg(long, default_value_t = 25)]
    delay_decrease_ms: u64,
}

impl GravityArg {
    pub(crate) fn to_curve(&self) -> anyhow::Result<GravityCurve> {
        let GravityArg {
            max_delay_ms,
            min_delay_ms,
            delay_decrease_ms,
        } = *self;
        let gravity = GravityCurve {
            max_delay: Duration::from_millis(max_delay_ms),
            min_delay: Duration::from_millis(min_delay_ms),
            delay_decrease: Duration::from_millis(delay_decrease_ms),
        };
        check_gravity(&gravity)?;
        Ok(gravity)
    }
}

/// Rejects gravity curves whose delays are zero or inverted.
pub(crate) fn check_gravity(gravity: &GravityCurve) -> anyhow::Result<()> {
    let GravityCurve {
        max_delay,
        min_delay,
        ..
    } = *gravity;
    anyhow::ensure!(
        !min_delay.is_zero() && min_delay <= max_delay,
        "gravity delays must satisfy 0 < min ({min_delay:?}) <= max ({max_delay:?})"
    );
    Ok(())
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Replay(arg) => replay::run(&arg)?,
    }
    Ok(())
}
