//! Cluster gravity: 4-connected groups of non-virus cells fall as rigid bodies.
//!
//! A pass flood-fills every cluster, starting column by column from the left,
//! and drops each one by the smallest free distance among its members. Passes repeat until one moves
//! nothing. Viruses never move and never join a cluster; they only block.

use crate::grid::{Arena, Cell};
use crate::pill::Position;
use std::collections::HashSet;

const NEIGHBOURS_4: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GravityReport {
    /// Passes run, including the final one that moved nothing.
    pub passes: u32,
    pub clusters_moved: u32,
}

impl GravityReport {
    pub fn moved(&self) -> bool {
        self.clusters_moved > 0
    }
}

/// Interior-sized visited bitmap.
struct Visited {
    width: usize,
    bits: Vec<bool>,
}

impl Visited {
    fn new(arena: &Arena) -> Self {
        let width = arena.width() - 2;
        Self {
            width,
            bits: vec![false; width * (arena.height() - 2)],
        }
    }

    #[inline]
    fn index(&self, p: Position) -> usize {
        (p.y as usize - 1) * self.width + (p.x as usize - 1)
    }

    #[inline]
    fn contains(&self, p: Position) -> bool {
        self.bits[self.index(p)]
    }

    #[inline]
    fn insert(&mut self, p: Position) {
        let i = self.index(p);
        self.bits[i] = true;
    }
}

#[inline]
fn is_mover(cell: Option<Cell>) -> bool {
    matches!(cell, Some(Cell::Block { .. }))
}

/// Flood-fill the cluster containing `start` through non-virus occupied cells,
/// marking members visited.
fn collect_cluster(arena: &Arena, start: Position, visited: &mut Visited) -> Vec<Position> {
    let mut cluster = Vec::new();
    let mut stack = vec![start];
    visited.insert(start);

    while let Some(p) = stack.pop() {
        cluster.push(p);
        for (dx, dy) in NEIGHBOURS_4 {
            let n = p.offset(dx, dy);
            if !arena.is_interior(n) || visited.contains(n) {
                continue;
            }
            if is_mover(arena.get(n)) {
                visited.insert(n);
                stack.push(n);
            }
        }
    }
    cluster
}

/// Rows the whole cluster can drop: the minimum over members of the free run
/// below each one, where cells of the same cluster count as free.
fn cluster_fall(arena: &Arena, cluster: &[Position]) -> i32 {
    let members: HashSet<Position> = cluster.iter().copied().collect();
    let floor = arena.height() as i32 - 1;

    cluster
        .iter()
        .map(|&p| {
            let mut drop = 0;
            loop {
                let below = p.offset(0, drop + 1);
                if below.y >= floor {
                    break;
                }
                let free = arena.get(below).is_some_and(|c| c.is_empty()) || members.contains(&below);
                if !free {
                    break;
                }
                drop += 1;
            }
            drop
        })
        .min()
        .unwrap_or(0)
}

/// Shift every member down by `dist`: lift all cells, then write them back
/// bottom-most first.
fn move_cluster(arena: &mut Arena, cluster: &mut [Position], dist: i32) {
    cluster.sort_by(|a, b| b.y.cmp(&a.y));
    let lifted: Vec<(Position, Cell)> = cluster
        .iter()
        .filter_map(|&p| arena.get(p).map(|cell| (p, cell)))
        .collect();
    for &(p, _) in &lifted {
        arena.put(p, Cell::Empty);
    }
    for (p, cell) in lifted {
        arena.put(p.offset(0, dist), cell);
    }
}

/// One pass over the interior, x outer and y inner. The final board depends on
/// this order: a cluster dropped early can land against one not yet scanned
/// and carry it along. Returns how many clusters moved.
pub fn gravity_pass(arena: &mut Arena) -> u32 {
    let mut visited = Visited::new(arena);
    let mut moved = 0;
    let starts: Vec<Position> = arena.interior_by_column().collect();

    for start in starts {
        if visited.contains(start) || !is_mover(arena.get(start)) {
            continue;
        }
        let mut cluster = collect_cluster(arena, start, &mut visited);
        let fall = cluster_fall(arena, &cluster);
        if fall > 0 {
            move_cluster(arena, &mut cluster, fall);
            moved += 1;
        }
    }
    moved
}

/// Run passes until the board reaches a fixed point. Terminates because every
/// productive pass lowers at least one cluster and the floor bounds the drop.
pub fn apply_cluster_gravity(arena: &mut Arena) -> GravityReport {
    let mut report = GravityReport::default();
    loop {
        report.passes += 1;
        let moved = gravity_pass(arena);
        report.clusters_moved += moved;
        if moved == 0 {
            return report;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pill::Color;

    fn block(color: Color) -> Cell {
        Cell::Block { color, texture: 3 }
    }

    fn arena() -> Arena {
        // Interior rows 1..=10, floor wall at y=11.
        Arena::empty(8, 12, 1).unwrap()
    }

    fn place(arena: &mut Arena, cells: &[(i32, i32)], color: Color) {
        for &(x, y) in cells {
            arena.set_cell(Position::new(x, y), block(color)).unwrap();
        }
    }

    fn snapshot(arena: &Arena) -> Vec<Option<Cell>> {
        arena.interior().map(|p| arena.get(p)).collect()
    }

    #[test]
    fn l_cluster_falls_two_rows_intact() {
        let mut arena = arena();
        // Viruses at row 9 leave a 2-row gap (rows 7, 8) under the L at rows 5..=6.
        arena.set_cell(Position::new(2, 9), Cell::Virus { color: Color::Red }).unwrap();
        arena.set_cell(Position::new(3, 9), Cell::Virus { color: Color::Red }).unwrap();
        place(&mut arena, &[(2, 5), (2, 6)], Color::Yellow);
        place(&mut arena, &[(3, 6)], Color::Red);

        let report = apply_cluster_gravity(&mut arena);
        assert_eq!(report.clusters_moved, 1);
        assert_eq!(arena.get(Position::new(2, 7)), Some(block(Color::Yellow)));
        assert_eq!(arena.get(Position::new(2, 8)), Some(block(Color::Yellow)));
        assert_eq!(arena.get(Position::new(3, 8)), Some(block(Color::Red)));
        for p in [Position::new(2, 5), Position::new(2, 6), Position::new(3, 6)] {
            assert_eq!(arena.get(p), Some(Cell::Empty));
        }
    }

    #[test]
    fn cluster_is_held_by_its_most_constrained_member() {
        let mut arena = arena();
        // Bridge spanning columns 2..=4 at row 4; column 4 has a virus at row 6.
        place(&mut arena, &[(2, 4), (3, 4), (4, 4)], Color::Red);
        arena.set_cell(Position::new(4, 6), Cell::Virus { color: Color::Blue }).unwrap();

        apply_cluster_gravity(&mut arena);
        for x in 2..=4 {
            assert_eq!(arena.get(Position::new(x, 5)), Some(block(Color::Red)));
        }
        assert_eq!(arena.get(Position::new(4, 6)), Some(Cell::Virus { color: Color::Blue }));
    }

    #[test]
    fn separate_columns_fall_independently() {
        let mut arena = arena();
        place(&mut arena, &[(2, 3)], Color::Red);
        place(&mut arena, &[(5, 7)], Color::Blue);

        apply_cluster_gravity(&mut arena);
        assert_eq!(arena.get(Position::new(2, 10)), Some(block(Color::Red)));
        assert_eq!(arena.get(Position::new(5, 10)), Some(block(Color::Blue)));
    }

    #[test]
    fn stacked_clusters_settle_in_order() {
        let mut arena = arena();
        place(&mut arena, &[(3, 2)], Color::Red);
        arena.set_cell(Position::new(4, 3), Cell::Virus { color: Color::Red }).unwrap();
        place(&mut arena, &[(3, 6), (3, 7)], Color::Yellow);

        apply_cluster_gravity(&mut arena);
        assert_eq!(arena.get(Position::new(3, 10)), Some(block(Color::Yellow)));
        assert_eq!(arena.get(Position::new(3, 9)), Some(block(Color::Yellow)));
        assert_eq!(arena.get(Position::new(3, 8)), Some(block(Color::Red)));
        assert_eq!(arena.get(Position::new(4, 3)), Some(Cell::Virus { color: Color::Red }));
    }

    #[test]
    fn viruses_do_not_glue_clusters() {
        let mut arena = arena();
        // Block hanging beside a virus is not part of it and still falls.
        arena.set_cell(Position::new(3, 4), Cell::Virus { color: Color::Red }).unwrap();
        place(&mut arena, &[(4, 4)], Color::Red);

        apply_cluster_gravity(&mut arena);
        assert_eq!(arena.get(Position::new(4, 10)), Some(block(Color::Red)));
        assert_eq!(arena.get(Position::new(3, 4)), Some(Cell::Virus { color: Color::Red }));
    }

    #[test]
    fn left_column_settles_before_its_neighbour_lands() {
        let mut arena = arena();
        arena.set_cell(Position::new(2, 8), Cell::Virus { color: Color::Blue }).unwrap();
        place(&mut arena, &[(1, 7)], Color::Red);
        place(&mut arena, &[(2, 3)], Color::Yellow);

        apply_cluster_gravity(&mut arena);
        assert_eq!(arena.get(Position::new(1, 10)), Some(block(Color::Red)));
        assert_eq!(arena.get(Position::new(1, 7)), Some(Cell::Empty));
        assert_eq!(arena.get(Position::new(2, 7)), Some(block(Color::Yellow)));
    }

    #[test]
    fn second_run_is_a_no_op() {
        let mut arena = arena();
        place(&mut arena, &[(1, 1), (2, 1), (2, 2)], Color::Blue);
        place(&mut arena, &[(5, 3), (6, 3)], Color::Yellow);
        arena.set_cell(Position::new(6, 8), Cell::Virus { color: Color::Yellow }).unwrap();

        let first = apply_cluster_gravity(&mut arena);
        assert!(first.moved());
        let settled = snapshot(&arena);
        let second = apply_cluster_gravity(&mut arena);
        assert_eq!(second, GravityReport { passes: 1, clusters_moved: 0 });
        assert_eq!(snapshot(&arena), settled);
    }
}
