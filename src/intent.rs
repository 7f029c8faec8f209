//! Discrete player intents and the one-character script notation.

use crate::error::IntentError;

/// One input to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    RotateCw,
    SoftDrop,
    DeploySword,
    /// Periodic gravity signal from the driver's timer.
    GravityTick,
}

impl Intent {
    /// Map a script symbol: `a`/`d` move, `w` rotate, `s` soft drop,
    /// `x` sword, `.` gravity tick. Case-insensitive.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'a' => Some(Self::MoveLeft),
            'd' => Some(Self::MoveRight),
            'w' => Some(Self::RotateCw),
            's' => Some(Self::SoftDrop),
            'x' => Some(Self::DeploySword),
            '.' => Some(Self::GravityTick),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::MoveLeft => 'a',
            Self::MoveRight => 'd',
            Self::RotateCw => 'w',
            Self::SoftDrop => 's',
            Self::DeploySword => 'x',
            Self::GravityTick => '.',
        }
    }
}

/// Parse a whole script, skipping whitespace.
pub fn parse_script(script: &str) -> Result<Vec<Intent>, IntentError> {
    script
        .chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(offset, symbol)| {
            Intent::from_symbol(symbol).ok_or(IntentError::UnknownSymbol { symbol, offset })
        })
        .collect()
}
