//! Pill generation and promotion of the preview pill.

use crate::grid::Arena;
use crate::pill::{Orientation, Pill, Position};
use rand::Rng;
use tracing::warn;

/// Row every pill enters on, just under the top wall.
pub const SPAWN_ROW: i32 = 1;

impl Arena {
    /// Pivot of a freshly spawned pill.
    pub fn spawn_position(&self) -> Position {
        Position::new(self.width() as i32 / 2, SPAWN_ROW)
    }

    /// Store a fresh random pill as the preview. Never fails.
    pub fn generate_next_pill<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let spawn = self.spawn_position();
        self.next_pill = Some(Pill::random_at(spawn.x, spawn.y, rng));
    }

    /// Move the preview pill to the spawn point as the current pill, generate a
    /// new preview and check the current pill fits. `false` means the spawn is
    /// blocked (game over); the promotion is not rolled back.
    pub fn promote_next_pill<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let mut next = match self.next_pill.take() {
            Some(p) => p,
            None => {
                let spawn = self.spawn_position();
                Pill::random_at(spawn.x, spawn.y, rng)
            }
        };
        next.pivot = self.spawn_position();
        self.current_pill = Some(next);
        self.generate_next_pill(rng);

        let fits = self.can_move(&next);
        if !fits {
            warn!(x = next.pivot.x, y = next.pivot.y, "spawn_blocked");
        }
        fits
    }

    /// Put `pill` back at the spawn point, lying flat, as the current pill and
    /// check it fits.
    pub fn respawn_pill(&mut self, mut pill: Pill) -> bool {
        pill.pivot = self.spawn_position();
        pill.orientation = Orientation::Right;
        self.current_pill = Some(pill);
        let fits = self.can_move(&pill);
        if !fits {
            warn!(x = pill.pivot.x, y = pill.pivot.y, "respawn_blocked");
        }
        fits
    }
}
