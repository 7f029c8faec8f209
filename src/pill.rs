//! Pills: a pivot half plus a second half derived from the orientation.

use rand::Rng;

/// Grid coordinate. y=0 is the top wall row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Pill, block and virus colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Yellow,
    Blue,
}

impl Color {
    pub const ALL: [Self; 3] = [Self::Red, Self::Yellow, Self::Blue];

    /// Uniform pick from the palette.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Direction from the pivot to the second half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Right,
    Up,
    Left,
    Down,
}

impl Orientation {
    pub const ALL: [Self; 4] = [Self::Right, Self::Up, Self::Left, Self::Down];

    pub fn index(self) -> u8 {
        match self {
            Self::Right => 0,
            Self::Up => 1,
            Self::Left => 2,
            Self::Down => 3,
        }
    }

    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index % 4) as usize]
    }

    /// Unit offset (dx, dy) of the second half relative to the pivot.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Right => (1, 0),
            Self::Up => (0, -1),
            Self::Left => (-1, 0),
            Self::Down => (0, 1),
        }
    }

    /// Next orientation in the 0 -> 1 -> 2 -> 3 -> 0 cycle.
    pub fn rotated(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

/// Falling two-cell unit. Only the pivot is stored; the second half is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pill {
    pub pivot: Position,
    pub color1: Color,
    pub color2: Color,
    pub orientation: Orientation,
}

impl Pill {
    /// New pill lying horizontally, second half to the right of the pivot.
    pub fn new(x: i32, y: i32, color1: Color, color2: Color) -> Self {
        Self {
            pivot: Position::new(x, y),
            color1,
            color2,
            orientation: Orientation::Right,
        }
    }

    pub fn random_at<R: Rng + ?Sized>(x: i32, y: i32, rng: &mut R) -> Self {
        let color1 = Color::random(rng);
        let color2 = Color::random(rng);
        Self::new(x, y, color1, color2)
    }

    pub fn other_half(&self) -> Position {
        let (dx, dy) = self.orientation.offset();
        self.pivot.offset(dx, dy)
    }

    /// Both halves with their colours, pivot first.
    pub fn cells(&self) -> [(Position, Color); 2] {
        [(self.pivot, self.color1), (self.other_half(), self.color2)]
    }

    pub fn rotate(&mut self) {
        self.orientation = self.orientation.rotated();
    }

    pub fn shift(&mut self, dx: i32, dy: i32) {
        self.pivot = self.pivot.offset(dx, dy);
    }

    pub fn move_left(&mut self) {
        self.shift(-1, 0);
    }

    pub fn move_right(&mut self) {
        self.shift(1, 0);
    }

    pub fn move_down(&mut self) {
        self.shift(0, 1);
    }

    pub fn move_up(&mut self) {
        self.shift(0, -1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_half_follows_orientation() {
        let mut pill = Pill::new(5, 5, Color::Red, Color::Blue);
        let expected = [
            Position::new(6, 5),
            Position::new(5, 4),
            Position::new(4, 5),
            Position::new(5, 6),
        ];
        for want in expected {
            assert_eq!(pill.other_half(), want, "orientation {:?}", pill.orientation);
            pill.rotate();
        }
    }

    #[test]
    fn four_rotations_return_to_start() {
        let mut pill = Pill::new(3, 7, Color::Yellow, Color::Yellow);
        let before = pill;
        for _ in 0..4 {
            pill.rotate();
        }
        assert_eq!(pill, before);
    }

    #[test]
    fn orientation_index_wraps() {
        assert_eq!(Orientation::from_index(4), Orientation::Right);
        assert_eq!(Orientation::Down.rotated(), Orientation::Right);
        assert_eq!(Orientation::Left.index(), 2);
    }

    #[test]
    fn cells_keep_colour_order() {
        let pill = Pill::new(2, 2, Color::Red, Color::Blue);
        let [(p1, c1), (p2, c2)] = pill.cells();
        assert_eq!((p1, c1), (Position::new(2, 2), Color::Red));
        assert_eq!((p2, c2), (Position::new(3, 2), Color::Blue));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_second_half_is_unit_offset(x in -20i32..20, y in -20i32..20, turns in 0u8..8) {
            let mut pill = Pill::new(x, y, Color::Red, Color::Blue);
            for _ in 0..turns {
                pill.rotate();
            }
            let other = pill.other_half();
            let manhattan = (other.x - x).abs() + (other.y - y).abs();
            prop_assert_eq!(manhattan, 1);
            prop_assert_eq!(pill.orientation.index(), turns % 4);
        }
    }
}
