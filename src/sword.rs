//! Sword power-up: a vertical 1x4 bar that cuts through blocks and viruses.

use crate::grid::{Arena, Cell};
use crate::pill::Position;
use tracing::debug;

/// Segments in a sword, top to bottom.
pub const SWORD_LEN: i32 = 4;

/// Row the sword's top segment spawns on.
pub const SWORD_SPAWN_ROW: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sword {
    pub top: Position,
}

impl Sword {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            top: Position::new(x, y),
        }
    }

    /// Segment positions from top to bottom.
    pub fn segments(&self) -> [Position; SWORD_LEN as usize] {
        std::array::from_fn(|i| self.top.offset(0, i as i32))
    }

    pub fn bottom(&self) -> Position {
        self.top.offset(0, SWORD_LEN - 1)
    }
}

/// Result of advancing the sword by one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwordStep {
    /// No sword is active.
    Idle,
    /// Dropped one row, cutting `destroyed` cells of which `viruses` were viruses.
    Fell { destroyed: usize, viruses: usize },
    /// Hit the floor and was removed.
    Landed,
}

impl Arena {
    /// Install a sword in column `x` with its top at row 1. All four cells must
    /// be inside, non-wall and empty; otherwise nothing changes.
    pub fn spawn_sword_at(&mut self, x: i32) -> bool {
        if self.current_sword.is_some() {
            return false;
        }
        let sword = Sword::new(x, SWORD_SPAWN_ROW);
        let clear = sword.segments().iter().all(|&p| {
            self.is_inside(p) && !self.is_wall(p) && self.get(p) == Some(Cell::Empty)
        });
        if clear {
            self.current_sword = Some(sword);
        }
        clear
    }

    /// Drop the sword one row, destroying whatever it now overlaps. Removes it
    /// once the next row would be the floor.
    pub fn step_sword(&mut self) -> SwordStep {
        let Some(mut sword) = self.current_sword else {
            return SwordStep::Idle;
        };
        let floor = self.height() as i32 - 1;
        if sword.bottom().y + 1 >= floor {
            self.current_sword = None;
            debug!(x = sword.top.x, "sword_landed");
            return SwordStep::Landed;
        }

        sword.top = sword.top.offset(0, 1);
        let mut destroyed = 0;
        let mut viruses = 0;
        for p in sword.segments() {
            match self.get(p) {
                Some(cell) if cell.is_piece() => {
                    if cell.is_virus() {
                        viruses += 1;
                    }
                    self.put(p, Cell::Empty);
                    destroyed += 1;
                }
                _ => {}
            }
        }
        self.current_sword = Some(sword);
        SwordStep::Fell { destroyed, viruses }
    }
}
