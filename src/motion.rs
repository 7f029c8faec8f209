//! Pill movement: copy the pill, move the copy, validate, then commit.

use crate::grid::{Arena, Cell, TEXTURE_VARIANTS};
use crate::pill::{Pill, Position};
use rand::Rng;
use tracing::debug;

/// Primitive pill transformations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Down,
    Up,
    Rotate,
}

impl Motion {
    fn apply(self, pill: &mut Pill) {
        match self {
            Self::Left => pill.move_left(),
            Self::Right => pill.move_right(),
            Self::Down => pill.move_down(),
            Self::Up => pill.move_up(),
            Self::Rotate => pill.rotate(),
        }
    }
}

/// Rebuild `pill` from its pivot and colours, then step the orientation
/// until the derived second half lines up with the given one.
fn replica(pill: &Pill) -> Pill {
    let mut copy = Pill::new(
        pill.pivot.x,
        pill.pivot.y,
        pill.color1,
        pill.color2,
    );
    let target = pill.other_half();
    for _ in 0..4 {
        if copy.other_half() == target {
            break;
        }
        copy.rotate();
    }
    copy
}

impl Arena {
    /// Inside, not a wall and empty in the matrix.
    pub fn is_valid_position(&self, p: Position) -> bool {
        self.is_inside(p) && !self.is_wall(p) && self.get(p) == Some(Cell::Empty)
    }

    /// True if both halves of `pill` could occupy their cells. Never mutates.
    pub fn can_move(&self, pill: &Pill) -> bool {
        self.is_valid_position(pill.pivot) && self.is_valid_position(pill.other_half())
    }

    /// Apply `motion` to the current pill if the result is valid. Returns
    /// whether the pill moved; on `false` the pill is untouched.
    pub fn try_motion(&mut self, motion: Motion) -> bool {
        let Some(current) = self.current_pill.as_ref() else {
            return false;
        };
        let mut next = replica(current);
        motion.apply(&mut next);
        if !self.can_move(&next) {
            return false;
        }
        if let Some(pill) = self.current_pill.as_mut() {
            motion.apply(pill);
        }
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.try_motion(Motion::Left)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_motion(Motion::Right)
    }

    pub fn move_down(&mut self) -> bool {
        self.try_motion(Motion::Down)
    }

    pub fn move_up(&mut self) -> bool {
        self.try_motion(Motion::Up)
    }

    /// Clockwise quarter turn with no wall-kick: a blocked rotation is refused.
    pub fn rotate(&mut self) -> bool {
        self.try_motion(Motion::Rotate)
    }

    /// One gravity step for the pill. `false` means it has landed.
    pub fn fall_one_step(&mut self) -> bool {
        self.move_down()
    }

    /// Split the current pill into two blocks in the matrix, each with its own
    /// random texture. Returns `false` if there was no pill.
    pub fn settle_pill<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let Some(pill) = self.current_pill.take() else {
            return false;
        };
        for (p, color) in pill.cells() {
            let texture = rng.gen_range(0..TEXTURE_VARIANTS);
            self.put(p, Cell::Block { color, texture });
        }
        debug!(
            x = pill.pivot.x,
            y = pill.pivot.y,
            orientation = pill.orientation.index(),
            "pill_settled"
        );
        true
    }
}
