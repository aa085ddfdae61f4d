//! The [`Tile`] type: one numbered piece on the board.

use crate::geom::Point;

/// How a tile came to be where it is this turn, as far as a renderer cares.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileKind {
    /// Spawned after the last move (or at game start / restore).
    New,
    /// Existed before the last move; may or may not have changed cell.
    Moved,
    /// Created by merging two tiles during the last move.
    Merged,
}

/// A numbered tile.
///
/// `value` is always a power of two, at least 2. `previous` and
/// `merged_from` are per-turn metadata: the engine resets both when it
/// prepares the next move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub pos: Point,
    pub value: u32,
    pub previous: Option<Point>,
    pub merged_from: Option<Box<[Tile; 2]>>,
}

impl Tile {
    /// Create a fresh tile at `pos`.
    pub fn new(pos: Point, value: u32) -> Self {
        debug_assert!(is_tile_value(value), "invalid tile value {value}");
        Self {
            pos,
            value,
            previous: None,
            merged_from: None,
        }
    }

    /// Whether `other` can merge with this tile: equal values, and a
    /// doubled value that is still a legal tile.
    #[inline]
    pub fn can_merge_with(&self, other: &Tile) -> bool {
        self.value == other.value && self.value < MAX_TILE_VALUE
    }

    /// Create the tile that results from merging `moving` into `stationary`.
    ///
    /// The new tile sits at the stationary tile's cell with twice its value.
    /// Callers check [`can_merge_with`](Tile::can_merge_with) first.
    pub fn merged(moving: Tile, stationary: Tile) -> Self {
        let mut tile = Tile::new(stationary.pos, stationary.value * 2);
        tile.merged_from = Some(Box::new([moving, stationary]));
        tile
    }

    /// Remember the current position so the next move can be animated.
    #[inline]
    pub fn save_position(&mut self) {
        self.previous = Some(self.pos);
    }

    /// Move the tile. `previous` is left alone.
    #[inline]
    pub fn update_position(&mut self, pos: Point) {
        self.pos = pos;
    }

    /// Classify the tile for rendering.
    pub fn kind(&self) -> TileKind {
        if self.merged_from.is_some() {
            TileKind::Merged
        } else if self.previous.is_some() {
            TileKind::Moved
        } else {
            TileKind::New
        }
    }
}

/// Largest tile value. Two of these never merge, so doubling a legal tile
/// always fits in a `u32`.
pub const MAX_TILE_VALUE: u32 = 1 << 30;

/// Whether `v` is a legal tile value: a power of two from 2 to
/// [`MAX_TILE_VALUE`].
#[inline]
pub fn is_tile_value(v: u32) -> bool {
    (2..=MAX_TILE_VALUE).contains(&v) && v.is_power_of_two()
}
