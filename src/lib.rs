//! Pillfall: grid simulation core for a pill-and-virus falling-block puzzle.
//!
//! Pills fall, get steered and rotated, settle into blocks, and clear when four
//! or more same-coloured cells line up. After a clear, connected groups of
//! blocks fall as rigid bodies until nothing moves.

pub mod clear;
pub mod error;
pub mod game;
pub mod gravity;
pub mod grid;
pub mod intent;
pub mod motion;
pub mod pill;
pub mod spawn;
pub mod sword;

pub use clear::{ClearReport, check_and_clear};
pub use error::{GridError, IntentError};
pub use game::{CascadeReport, GameState, StepOutcome};
pub use gravity::{GravityReport, apply_cluster_gravity};
pub use grid::{Arena, Cell};
pub use intent::{Intent, parse_script};
pub use pill::{Color, Orientation, Pill, Position};
pub use sword::{Sword, SwordStep};

use clap::ValueEnum;
use std::time::Duration;

/// Settings a game is started with. The driver owns timing; the core only
/// reads these.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub virus_count: usize,
    pub level: u32,
    pub difficulty: Difficulty,
    pub mode: GameMode,
    pub sword_charges: u32,
    /// Declare victory on an empty board even when the round started with no
    /// viruses.
    pub endless_victory: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 18,
            virus_count: 5,
            level: 1,
            difficulty: Difficulty::Normal,
            mode: GameMode::Levels,
            sword_charges: 1,
            endless_victory: false,
        }
    }
}

impl GameConfig {
    /// Endless games start without viruses.
    pub fn effective_virus_count(&self) -> usize {
        match self.mode {
            GameMode::Levels => self.virus_count,
            GameMode::Endless => 0,
        }
    }

    /// Victory needs viruses at the start of the round, or the explicit
    /// `endless_victory` opt-in.
    pub fn victory_enabled(&self, starting_viruses: usize) -> bool {
        starting_viruses > 0 || self.endless_victory
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GameMode {
    /// Clear every virus to win.
    #[default]
    Levels,
    /// No viruses; play until the spawn is blocked.
    Endless,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Insane,
}

impl Difficulty {
    /// Interval between gravity ticks; used by the driver's timer.
    pub fn fall_delay(self) -> Duration {
        match self {
            Self::Easy => Duration::from_millis(700),
            Self::Normal => Duration::from_millis(500),
            Self::Hard => Duration::from_millis(300),
            Self::Insane => Duration::from_millis(150),
        }
    }

    /// Points per cleared cell.
    pub fn score_multiplier(self) -> u32 {
        match self {
            Self::Easy => 10,
            Self::Normal => 15,
            Self::Hard => 20,
            Self::Insane => 30,
        }
    }
}
