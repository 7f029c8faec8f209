//! Arena: cell matrix, border walls and the floating pill/sword entities.

use crate::error::GridError;
use crate::pill::{Color, Pill, Position};
use crate::sword::Sword;
use rand::Rng;
use tracing::debug;

/// Number of block texture variants a presentation layer can pick from.
pub const TEXTURE_VARIANTS: u8 = 8;

/// Viruses are never placed above this row, keeping the spawn area clear.
pub const VIRUS_MIN_ROW: i32 = 4;

/// Random placement attempts allowed per requested virus.
const VIRUS_ATTEMPTS_PER_TARGET: usize = 2;

pub const MIN_WIDTH: usize = 5;
pub const MIN_HEIGHT: usize = 6;

/// Single matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Block { color: Color, texture: u8 },
    Virus { color: Color },
    Wall,
}

impl Cell {
    /// Colour of a block or virus; `None` for empty and wall cells.
    #[inline]
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Block { color, .. } | Self::Virus { color } => Some(*color),
            Self::Empty | Self::Wall => None,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[inline]
    pub fn is_virus(&self) -> bool {
        matches!(self, Self::Virus { .. })
    }

    /// Block or virus.
    #[inline]
    pub fn is_piece(&self) -> bool {
        matches!(self, Self::Block { .. } | Self::Virus { .. })
    }
}

/// Playfield of one game or level. y=0 is the top wall row, y=height-1 the floor.
#[derive(Debug, Clone)]
pub struct Arena {
    width: usize,
    height: usize,
    /// rows[y][x] = cell. The outermost ring is always `Cell::Wall`.
    rows: Vec<Vec<Cell>>,
    walls: Vec<Position>,
    level: u32,
    pub current_pill: Option<Pill>,
    pub next_pill: Option<Pill>,
    pub current_sword: Option<Sword>,
}

impl Arena {
    /// Arena with walls only: no viruses, no pills.
    pub fn empty(width: usize, height: usize, level: u32) -> Result<Self, GridError> {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let mut rows = vec![vec![Cell::Empty; width]; height];
        let mut walls = Vec::with_capacity(2 * (width + height));
        for (y, row) in rows.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    *cell = Cell::Wall;
                    walls.push(Position::new(x as i32, y as i32));
                }
            }
        }
        Ok(Self {
            width,
            height,
            rows,
            walls,
            level,
            current_pill: None,
            next_pill: None,
            current_sword: None,
        })
    }

    /// Fresh arena: scatters up to `virus_count` viruses and promotes a first pill.
    pub fn new<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        virus_count: usize,
        level: u32,
        rng: &mut R,
    ) -> Result<Self, GridError> {
        let mut arena = Self::empty(width, height, level)?;
        arena.spawn_viruses(virus_count, rng);
        arena.generate_next_pill(rng);
        let spawned = arena.promote_next_pill(rng);
        debug_assert!(spawned, "rows above VIRUS_MIN_ROW are empty on a fresh arena");
        Ok(arena)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Border ring positions, row by row.
    pub fn walls(&self) -> &[Position] {
        &self.walls
    }

    #[inline]
    pub fn is_inside(&self, p: Position) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    /// Inside the matrix and not on the border ring.
    #[inline]
    pub fn is_interior(&self, p: Position) -> bool {
        p.x >= 1 && p.y >= 1 && (p.x as usize) < self.width - 1 && (p.y as usize) < self.height - 1
    }

    #[inline]
    pub fn is_wall(&self, p: Position) -> bool {
        self.is_inside(p) && !self.is_interior(p)
    }

    pub fn cell_at(&self, p: Position) -> Result<Cell, GridError> {
        self.get(p).ok_or(GridError::OutOfBounds { x: p.x, y: p.y })
    }

    #[inline]
    pub fn get(&self, p: Position) -> Option<Cell> {
        if !self.is_inside(p) {
            return None;
        }
        self.rows
            .get(p.y as usize)
            .and_then(|row| row.get(p.x as usize))
            .copied()
    }

    pub fn set_cell(&mut self, p: Position, cell: Cell) -> Result<(), GridError> {
        if !self.is_inside(p) {
            return Err(GridError::OutOfBounds { x: p.x, y: p.y });
        }
        self.put(p, cell);
        Ok(())
    }

    /// Write without reporting; out-of-bounds writes are dropped.
    #[inline]
    pub(crate) fn put(&mut self, p: Position, cell: Cell) {
        if self.is_inside(p) {
            if let Some(row) = self.rows.get_mut(p.y as usize) {
                row[p.x as usize] = cell;
            }
        }
    }

    /// Interior positions in raster order (top row first, left to right).
    pub fn interior(&self) -> impl Iterator<Item = Position> + '_ {
        let (w, h) = (self.width as i32, self.height as i32);
        (1..h - 1).flat_map(move |y| (1..w - 1).map(move |x| Position::new(x, y)))
    }

    /// Interior positions column by column (left column first, top to bottom).
    pub fn interior_by_column(&self) -> impl Iterator<Item = Position> + '_ {
        let (w, h) = (self.width as i32, self.height as i32);
        (1..w - 1).flat_map(move |x| (1..h - 1).map(move |y| Position::new(x, y)))
    }

    /// Linear scan; never cached.
    pub fn virus_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.is_virus())
            .count()
    }

    /// Scatter up to `count` viruses below [`VIRUS_MIN_ROW`]. Gives up after
    /// `count * 2` attempts, so fewer may be placed. Returns the number placed.
    ///
    /// `count` is capped at the size of the virus zone.
    pub fn spawn_viruses<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> usize {
        let (min_x, max_x) = (1, self.width as i32 - 2);
        let (min_y, max_y) = (VIRUS_MIN_ROW, self.height as i32 - 2);
        if min_y > max_y {
            return 0;
        }
        let zone = ((max_x - min_x + 1) * (max_y - min_y + 1)) as usize;
        let count = count.min(zone);
        let max_attempts = count.saturating_mul(VIRUS_ATTEMPTS_PER_TARGET);

        let mut placed = 0;
        let mut attempts = 0;
        while placed < count && attempts < max_attempts {
            attempts += 1;
            let p = Position::new(rng.gen_range(min_x..=max_x), rng.gen_range(min_y..=max_y));
            if self.get(p) == Some(Cell::Empty) {
                let color = Color::random(rng);
                self.put(p, Cell::Virus { color });
                placed += 1;
            }
        }
        if placed < count {
            debug!(requested = count, placed, attempts, "virus_under_placement");
        }
        placed
    }
}
