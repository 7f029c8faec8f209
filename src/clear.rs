//! Run detection: four or more same-coloured cells in a row or column.

use crate::grid::{Arena, Cell};
use crate::pill::Position;
use std::collections::HashSet;

/// Minimum run length that clears.
pub const CLEAR_RUN: usize = 4;

/// Scan directions: +x (horizontal) and +y (vertical).
const DIRECTIONS: [(i32, i32); 2] = [(1, 0), (0, 1)];

/// Outcome of one clear pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub removed: usize,
    pub viruses_removed: usize,
    pub score_delta: u32,
}

impl ClearReport {
    pub fn is_empty(&self) -> bool {
        self.removed == 0
    }
}

/// Every cell that belongs to a run of at least [`CLEAR_RUN`]. Each interior
/// block or virus scans forward for up to three more matching cells; the marks
/// are unioned, so runs longer than four are covered by overlapping windows.
pub fn find_runs(arena: &Arena) -> HashSet<Position> {
    let mut marked = HashSet::new();
    for start in arena.interior() {
        let Some(color) = arena.get(start).and_then(|c| c.color()) else {
            continue;
        };
        for (dx, dy) in DIRECTIONS {
            let mut run = vec![start];
            for step in 1..CLEAR_RUN as i32 {
                let p = start.offset(dx * step, dy * step);
                match arena.get(p) {
                    Some(cell) if cell.color() == Some(color) => run.push(p),
                    _ => break,
                }
            }
            if run.len() >= CLEAR_RUN {
                marked.extend(run);
            }
        }
    }
    marked
}

/// Remove every run in one pass. Blocks and viruses score alike:
/// `score_delta = removed * multiplier`.
pub fn check_and_clear(arena: &mut Arena, multiplier: u32) -> ClearReport {
    let marked = find_runs(arena);
    let mut viruses_removed = 0;
    for &p in &marked {
        if arena.get(p).is_some_and(|c| c.is_virus()) {
            viruses_removed += 1;
        }
        arena.put(p, Cell::Empty);
    }
    ClearReport {
        removed: marked.len(),
        viruses_removed,
        score_delta: marked.len() as u32 * multiplier,
    }
}
