//! Game state: arena, score, sword charges, and the settle -> clear -> gravity
//! -> spawn sequence that runs when a pill lands.

use crate::clear::check_and_clear;
use crate::error::GridError;
use crate::gravity::apply_cluster_gravity;
use crate::grid::Arena;
use crate::intent::Intent;
use crate::pill::Pill;
use crate::sword::SwordStep;
use crate::GameConfig;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

/// Cleared cells needed to earn one sword charge.
pub const SWORD_CHARGE_CELLS: usize = 16;

/// Totals for one clear -> gravity cascade. Each productive clear pass is one
/// chain link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub chain: u32,
    pub removed: usize,
    pub viruses_removed: usize,
    pub score_delta: u32,
}

/// What a single intent did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing to act on: no pill, or the round is over.
    Idle,
    Moved,
    /// The move or rotation was invalid; state is unchanged.
    Rejected,
    /// The pill landed and the board was resolved.
    Settled(CascadeReport),
    SwordDeployed,
    SwordFell { destroyed: usize, viruses: usize },
    /// The sword reached the floor and the board was resolved.
    SwordLanded(CascadeReport),
}

#[derive(Debug)]
pub struct GameState {
    pub arena: Arena,
    pub score: u32,
    pub game_over: bool,
    pub victory: bool,
    pub sword_charges: u32,
    config: GameConfig,
    rng: StdRng,
    /// Cleared cells not yet converted into a sword charge.
    charge_progress: usize,
    /// Pill set aside while a sword falls.
    suspended_pill: Option<Pill>,
    /// Viruses on the board when the round began.
    starting_viruses: usize,
}

impl GameState {
    /// Seeded game; the same seed and intents replay the same game.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, GridError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let arena = Self::build_arena(&config, &mut rng)?;
        Ok(Self::with_arena(config, arena, rng))
    }

    /// Game around a prepared arena.
    pub fn with_arena(config: GameConfig, arena: Arena, rng: StdRng) -> Self {
        let sword_charges = config.sword_charges;
        let starting_viruses = arena.virus_count();
        Self {
            arena,
            score: 0,
            game_over: false,
            victory: false,
            sword_charges,
            config,
            rng,
            charge_progress: 0,
            suspended_pill: None,
            starting_viruses,
        }
    }

    fn build_arena(config: &GameConfig, rng: &mut StdRng) -> Result<Arena, GridError> {
        Arena::new(
            config.width,
            config.height,
            config.effective_virus_count(),
            config.level,
            rng,
        )
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Replace the arena wholesale and reset the round.
    pub fn restart(&mut self) -> Result<(), GridError> {
        self.arena = Self::build_arena(&self.config, &mut self.rng)?;
        self.score = 0;
        self.game_over = false;
        self.victory = false;
        self.sword_charges = self.config.sword_charges;
        self.charge_progress = 0;
        self.suspended_pill = None;
        self.starting_viruses = self.arena.virus_count();
        Ok(())
    }

    /// True while intents can still change the board.
    pub fn is_running(&self) -> bool {
        !self.game_over && !self.victory
    }

    pub fn apply(&mut self, intent: Intent) -> StepOutcome {
        if !self.is_running() {
            return StepOutcome::Idle;
        }
        if self.arena.current_sword.is_some() {
            return match intent {
                Intent::GravityTick | Intent::SoftDrop => self.advance_sword(),
                _ => StepOutcome::Idle,
            };
        }
        match intent {
            Intent::MoveLeft => self.motion_outcome(Arena::move_left),
            Intent::MoveRight => self.motion_outcome(Arena::move_right),
            Intent::RotateCw => self.motion_outcome(Arena::rotate),
            Intent::SoftDrop | Intent::GravityTick => self.fall(),
            Intent::DeploySword => self.deploy_sword(),
        }
    }

    /// Shorthand for a timer-driven gravity step.
    pub fn gravity_tick(&mut self) -> StepOutcome {
        self.apply(Intent::GravityTick)
    }

    fn motion_outcome(&mut self, motion: fn(&mut Arena) -> bool) -> StepOutcome {
        if self.arena.current_pill.is_none() {
            return StepOutcome::Idle;
        }
        if motion(&mut self.arena) {
            StepOutcome::Moved
        } else {
            StepOutcome::Rejected
        }
    }

    fn fall(&mut self) -> StepOutcome {
        if self.arena.current_pill.is_none() {
            return StepOutcome::Idle;
        }
        if self.arena.fall_one_step() {
            return StepOutcome::Moved;
        }
        StepOutcome::Settled(self.settle())
    }

    /// Land the pill, resolve the board, then spawn the next pill unless the
    /// round was won.
    fn settle(&mut self) -> CascadeReport {
        self.arena.settle_pill(&mut self.rng);
        let report = self.resolve_clears();
        if self.check_victory() {
            return report;
        }
        if !self.arena.promote_next_pill(&mut self.rng) {
            self.game_over = true;
        }
        report
    }

    /// Clear -> gravity until a clear pass removes nothing. Gravity only runs
    /// after cells were removed.
    fn resolve_clears(&mut self) -> CascadeReport {
        let multiplier = self.config.difficulty.score_multiplier();
        let mut report = CascadeReport::default();
        loop {
            let clear = check_and_clear(&mut self.arena, multiplier);
            if clear.is_empty() {
                break;
            }
            report.chain += 1;
            report.removed += clear.removed;
            report.viruses_removed += clear.viruses_removed;
            report.score_delta += clear.score_delta;
            let gravity = apply_cluster_gravity(&mut self.arena);
            debug!(
                chain = report.chain,
                removed = clear.removed,
                passes = gravity.passes,
                clusters_moved = gravity.clusters_moved,
                "chain_link"
            );
        }
        if report.chain > 0 {
            self.score += report.score_delta;
            self.earn_charges(report.removed);
            info!(
                chain = report.chain,
                removed = report.removed,
                viruses_removed = report.viruses_removed,
                score_delta = report.score_delta,
                viruses_left = self.arena.virus_count(),
                "cleared"
            );
        }
        report
    }

    fn earn_charges(&mut self, removed: usize) {
        self.charge_progress += removed;
        while self.charge_progress >= SWORD_CHARGE_CELLS {
            self.charge_progress -= SWORD_CHARGE_CELLS;
            self.sword_charges += 1;
            info!(charges = self.sword_charges, "sword_charge_earned");
        }
    }

    /// Latches victory the first time no viruses remain, if the round allows it.
    fn check_victory(&mut self) -> bool {
        if !self.victory
            && self.config.victory_enabled(self.starting_viruses)
            && self.arena.virus_count() == 0
        {
            self.victory = true;
            info!(score = self.score, "victory");
        }
        self.victory
    }

    /// Spend a charge to drop a sword down the current pill's column. The pill
    /// is set aside until the sword is gone.
    fn deploy_sword(&mut self) -> StepOutcome {
        let Some(pill) = self.arena.current_pill else {
            return StepOutcome::Idle;
        };
        if self.sword_charges == 0 || !self.arena.spawn_sword_at(pill.pivot.x) {
            return StepOutcome::Rejected;
        }
        self.sword_charges -= 1;
        self.suspended_pill = self.arena.current_pill.take();
        info!(x = pill.pivot.x, charges = self.sword_charges, "sword_deployed");
        StepOutcome::SwordDeployed
    }

    fn advance_sword(&mut self) -> StepOutcome {
        match self.arena.step_sword() {
            SwordStep::Idle => StepOutcome::Idle,
            SwordStep::Fell { destroyed, viruses } => {
                self.score += destroyed as u32 * self.config.difficulty.score_multiplier();
                StepOutcome::SwordFell { destroyed, viruses }
            }
            SwordStep::Landed => {
                apply_cluster_gravity(&mut self.arena);
                let report = self.resolve_clears();
                if self.check_victory() {
                    return StepOutcome::SwordLanded(report);
                }
                let resumed = match self.suspended_pill.take() {
                    Some(pill) => self.arena.respawn_pill(pill),
                    None => self.arena.promote_next_pill(&mut self.rng),
                };
                if !resumed {
                    self.game_over = true;
                }
                StepOutcome::SwordLanded(report)
            }
        }
    }
}
