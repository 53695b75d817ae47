use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use tilefall_engine::{
    Board, Command, GameConfig, GameEvent, GameOverReason, GameSession, GameStats, PieceSeed,
    drop_interval_for_level,
};

use crate::util::Output;

/// Most commands the random policy issues between two steps.
const MAX_COMMANDS_PER_STEP: usize = 3;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum Policy {
    /// Random moves and rotations before every step
    #[default]
    Random,
    /// No commands; pieces only fall
    Idle,
}

impl Policy {
    fn issue_commands<R>(self, session: &mut GameSession, rng: &mut R)
    where
        R: Rng,
    {
        match self {
            Policy::Idle => {}
            Policy::Random => {
                for _ in 0..rng.random_range(0..=MAX_COMMANDS_PER_STEP) {
                    let command = Command::ALL[rng.random_range(0..Command::ALL.len())];
                    session.apply(command);
                }
            }
        }
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Board width, walls included
    #[arg(long, default_value_t = GameConfig::DEFAULT_WIDTH)]
    width: usize,
    /// Board height, walls included
    #[arg(long, default_value_t = GameConfig::DEFAULT_HEIGHT)]
    height: usize,
    /// Gravity interval in milliseconds; overrides the one picked by --level
    #[arg(long)]
    drop_interval_ms: Option<u64>,
    /// Level whose speed sets the gravity interval
    #[arg(long, default_value_t = 0)]
    level: usize,
    /// Piece seed as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// How commands are chosen
    #[arg(long, default_value = "random")]
    policy: Policy,
    /// Seed of the random policy
    #[arg(long, default_value_t = 0)]
    policy_seed: u64,
    /// Quit the session after this many steps
    #[arg(long, default_value_t = 10_000)]
    max_steps: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, serde::Serialize)]
struct ConfigSummary {
    width: usize,
    height: usize,
    drop_interval_ms: u128,
    delete_interval_ms: u128,
}

impl From<&GameConfig> for ConfigSummary {
    fn from(config: &GameConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            drop_interval_ms: config.drop_interval.as_millis(),
            delete_interval_ms: config.delete_interval().as_millis(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
struct SimulationSummary {
    seed: PieceSeed,
    config: ConfigSummary,
    stats: GameStats,
    steps: usize,
    game_over_reason: GameOverReason,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        width,
        height,
        drop_interval_ms,
        level,
        seed,
        policy,
        policy_seed,
        max_steps,
        output,
    } = arg;

    let config = GameConfig {
        width: *width,
        height: *height,
        drop_interval: drop_interval_ms
            .map_or_else(|| drop_interval_for_level(*level), Duration::from_millis),
    };
    let seed = seed.unwrap_or_else(|| rand::rng().random());

    eprintln!(
        "Simulating a {width}x{height} board (drop interval {:?}, seed {seed}, policy {policy:?})",
        config.drop_interval
    );
    let (summary, board) = simulate(config, seed, *policy, *policy_seed, *max_steps)?;

    eprintln!();
    eprint!("{board}");
    eprintln!();
    eprintln!("Game over: {}", summary.game_over_reason);
    eprintln!("  Steps: {}", summary.steps);
    eprintln!("  Pieces: {}", summary.stats.completed_pieces());
    eprintln!("  Lines: {}", summary.stats.total_cleared_lines());
    eprintln!("  Score: {}", summary.stats.score());

    Output::save_json(&summary, output.as_deref())?;
    Ok(())
}

fn simulate(
    config: GameConfig,
    seed: PieceSeed,
    policy: Policy,
    policy_seed: u64,
    max_steps: usize,
) -> anyhow::Result<(SimulationSummary, Board)> {
    let mut session = GameSession::with_seed(config, seed).context("Invalid game configuration")?;
    let mut rng = Pcg32::seed_from_u64(policy_seed);
    let mut steps = 0;
    let mut game_over_reason = None;

    session.start_session();
    loop {
        for event in session.drain_events() {
            match event {
                GameEvent::ScoreDelta { lines, amount } => {
                    eprintln!("  step {steps:5}: cleared {lines} line(s), +{amount}");
                }
                GameEvent::GameOver { reason } => game_over_reason = Some(reason),
                _ => {}
            }
        }
        let Some(interval) = session.pending_interval() else {
            break;
        };
        if steps >= max_steps {
            session.quit();
            continue;
        }
        if session.progress().is_playing() {
            policy.issue_commands(&mut session, &mut rng);
        }
        steps += session
            .advance(interval)
            .context("Board invariant violated during simulation")?;
    }

    let summary = SimulationSummary {
        seed,
        config: ConfigSummary::from(session.config()),
        stats: session.stats().clone(),
        steps,
        game_over_reason: game_over_reason.context("Session ended without a game over event")?,
    };
    Ok((summary, session.snapshot()))
}
