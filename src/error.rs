//! Error types for grid queries and intent scripts.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("position ({x}, {y}) is outside the arena")]
    OutOfBounds { x: i32, y: i32 },
    #[error("arena {width}x{height} is too small (need at least 5x6)")]
    InvalidDimensions { width: usize, height: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("unknown script symbol {symbol:?} at offset {offset}")]
    UnknownSymbol { symbol: char, offset: usize },
}
