//! Pillfall: headless driver for the pill-and-virus puzzle core.

use anyhow::{Context, Result};
use clap::Parser;
use pillfall::{
    Difficulty, GameConfig, GameMode, GameState, Intent, StepOutcome, parse_script,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Odds (out of 100) that the autoplayer spends a sword charge on a turn.
const AUTOPLAY_SWORD_ODDS: u32 = 2;

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = GameConfig {
        width: args.width,
        height: args.height,
        virus_count: args.viruses,
        level: args.level,
        difficulty: args.difficulty,
        mode: args.mode,
        sword_charges: args.sword_charges,
        endless_victory: args.endless_victory,
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut game = GameState::new(config, seed)
        .with_context(|| format!("cannot start a {}x{} game", args.width, args.height))?;
    info!(
        seed,
        width = args.width,
        height = args.height,
        viruses = game.arena.virus_count(),
        "game_started"
    );

    let delay = args.realtime.then(|| args.difficulty.fall_delay());
    let summary = match args.script.as_deref() {
        Some(script) => {
            let intents = parse_script(script).context("bad --script")?;
            run_script(&mut game, &intents, delay)
        }
        None => run_autoplay(&mut game, seed, args.max_ticks, delay),
    };

    let outcome = if game.victory {
        "victory"
    } else if game.game_over {
        "game over"
    } else {
        "stopped"
    };
    println!("outcome:      {outcome}");
    println!("score:        {}", game.score);
    println!("viruses left: {}", game.arena.virus_count());
    println!("pills placed: {}", summary.settles);
    println!("best chain:   {}", summary.best_chain);
    println!("intents:      {}", summary.intents);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[derive(Debug, Default)]
struct RunSummary {
    intents: u32,
    settles: u32,
    best_chain: u32,
}

impl RunSummary {
    fn record(&mut self, outcome: StepOutcome) {
        self.intents += 1;
        match outcome {
            StepOutcome::Settled(report) => {
                self.settles += 1;
                self.best_chain = self.best_chain.max(report.chain);
            }
            StepOutcome::SwordLanded(report) => {
                self.best_chain = self.best_chain.max(report.chain);
            }
            _ => {}
        }
    }
}

fn pace(intent: Intent, delay: Option<Duration>) {
    if let (Intent::GravityTick, Some(d)) = (intent, delay) {
        std::thread::sleep(d);
    }
}

/// Feed a scripted intent stream until it runs out or the round ends.
fn run_script(game: &mut GameState, intents: &[Intent], delay: Option<Duration>) -> RunSummary {
    let mut summary = RunSummary::default();
    for &intent in intents {
        if !game.is_running() {
            break;
        }
        pace(intent, delay);
        let outcome = game.apply(intent);
        debug!(intent = %intent.symbol(), ?outcome, "step");
        summary.record(outcome);
    }
    summary
}

/// Random player: one steering intent then one gravity tick per turn.
fn run_autoplay(
    game: &mut GameState,
    seed: u64,
    max_ticks: u32,
    delay: Option<Duration>,
) -> RunSummary {
    let mut player = StdRng::seed_from_u64(seed.rotate_left(17));
    let mut summary = RunSummary::default();
    for _ in 0..max_ticks {
        if !game.is_running() {
            break;
        }
        let steer = if player.gen_range(0..100) < AUTOPLAY_SWORD_ODDS {
            Intent::DeploySword
        } else {
            match player.gen_range(0..4) {
                0 => Intent::MoveLeft,
                1 => Intent::MoveRight,
                2 => Intent::RotateCw,
                _ => Intent::SoftDrop,
            }
        };
        summary.record(game.apply(steer));
        pace(Intent::GravityTick, delay);
        summary.record(game.gravity_tick());
    }
    summary
}

/// Headless pill-and-virus puzzle simulation.
#[derive(Debug, Parser)]
#[command(
    name = "pillfall",
    version,
    about = "Headless pill-and-virus falling-block puzzle. Plays a scripted or random game and reports the result.",
    long_about = "Pillfall simulates a pill-and-virus falling-block puzzle without a screen.\n\n\
        Two-cell pills fall into a walled arena seeded with viruses. Four or more same-coloured \
        cells in a row or column clear; connected blocks then fall together as rigid clusters.\n\n\
        SCRIPT SYMBOLS (--script):\n  a  Move left    d  Move right    w  Rotate\n  \
        s  Soft drop    x  Deploy sword  .  Gravity tick\n\n\
        Without --script a seeded random player runs for up to --max-ticks turns. \
        Set RUST_LOG=debug to trace every step."
)]
pub struct Args {
    /// Game mode: levels (clear all viruses to win) or endless (no viruses, play until blocked).
    #[arg(short, long, default_value = "levels")]
    pub mode: GameMode,

    /// Difficulty: sets the gravity interval and the points per cleared cell.
    #[arg(short, long, default_value = "normal")]
    pub difficulty: Difficulty,

    /// Arena width in cells, including the walls.
    #[arg(long, default_value = "10", value_name = "COLS")]
    pub width: usize,

    /// Arena height in cells, including the walls.
    #[arg(long, default_value = "18", value_name = "ROWS")]
    pub height: usize,

    /// Viruses to scatter (levels mode). Fewer may be placed on a crowded board.
    #[arg(short, long, default_value = "5", value_name = "N")]
    pub viruses: usize,

    /// Level number recorded on the arena.
    #[arg(long, default_value = "1", value_name = "N")]
    pub level: u32,

    /// Sword charges at the start of the game.
    #[arg(long, default_value = "1", value_name = "N")]
    pub sword_charges: u32,

    /// In endless mode, still declare victory when no viruses remain.
    #[arg(long)]
    pub endless_victory: bool,

    /// RNG seed; random if not set.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Intent script to play instead of the random player.
    #[arg(short, long, value_name = "INTENTS")]
    pub script: Option<String>,

    /// Turn limit for the random player.
    #[arg(long, default_value = "5000", value_name = "N")]
    pub max_ticks: u32,

    /// Sleep the difficulty's gravity interval before every gravity tick.
    #[arg(long)]
    pub realtime: bool,
}
