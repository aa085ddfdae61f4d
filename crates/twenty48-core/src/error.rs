//! Error types for rule validation and state restoration.

use std::fmt;

use crate::geom::Point;
use crate::tile::MAX_TILE_VALUE;

/// A persisted game state that does not describe a legal board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateError {
    /// The grid size is zero, negative or above [`MAX_SIZE`](crate::grid::MAX_SIZE).
    BadSize(i32),
    /// The cell matrix does not have `size` columns of `size` cells.
    BadShape { size: i32 },
    /// A stored tile value is not a power of two from 2 to [`MAX_TILE_VALUE`].
    BadValue { at: Point, value: u32 },
    /// A stored tile claims a position other than the cell it was found in.
    PositionMismatch { cell: Point, stored: Point },
    /// The saved grid has a different size than the rules in effect.
    SizeMismatch { expected: i32, found: i32 },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadSize(n) => write!(f, "invalid grid size {n}"),
            Self::BadShape { size } => {
                write!(f, "cell matrix is not {size}x{size}")
            }
            Self::BadValue { at, value } => {
                write!(f, "invalid tile value {value} at {at}")
            }
            Self::PositionMismatch { cell, stored } => {
                write!(f, "tile stored in cell {cell} claims position {stored}")
            }
            Self::SizeMismatch { expected, found } => {
                write!(f, "saved grid is {found}x{found}, expected {expected}x{expected}")
            }
        }
    }
}

impl std::error::Error for StateError {}

/// Game rules that cannot be played.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RulesError {
    /// Grid size must be at least 1.
    BadSize(i32),
    /// Grid size above [`MAX_SIZE`](crate::grid::MAX_SIZE).
    TooLarge { size: i32, max: i32 },
    /// Winning value must be a reachable power of two ≥ 4.
    BadWinValue(u32),
    /// More start tiles than the grid has cells.
    TooManyStartTiles { start_tiles: usize, cells: usize },
}

impl fmt::Display for RulesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadSize(n) => write!(f, "grid size must be at least 1, got {n}"),
            Self::TooLarge { size, max } => {
                write!(f, "grid size must be at most {max}, got {size}")
            }
            Self::BadWinValue(v) => {
                write!(f, "winning value must be a power of two from 4 to {MAX_TILE_VALUE}, got {v}")
            }
            Self::TooManyStartTiles { start_tiles, cells } => {
                write!(f, "{start_tiles} start tiles do not fit in {cells} cells")
            }
        }
    }
}

impl std::error::Error for RulesError {}
