//! Plain-data snapshots of a game, suitable for persistence.
//!
//! Only occupancy and values are kept. Previous positions and merge sources
//! are per-turn animation metadata and do not survive a save.
//!
//! With the `serde` feature the snapshots use the browser game's key names
//! (`keepPlaying`, `cells[x][y]` column-major), so a stored blob looks like:
//!
//! ```text
//! {"grid":{"size":4,"cells":[[null,{"position":{"x":0,"y":1},"value":2},..],..]},
//!  "score":4,"over":false,"won":false,"keepPlaying":false}
//! ```

use crate::geom::Point;

/// A single stored tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileState {
    pub position: Point,
    pub value: u32,
}

/// A stored grid. `cells[x][y]` holds the tile in column `x`, row `y`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridState {
    pub size: i32,
    pub cells: Vec<Vec<Option<TileState>>>,
}

/// A stored game: grid, score and flags.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SavedGame {
    pub grid: GridState,
    pub score: u64,
    pub over: bool,
    pub won: bool,
    pub keep_playing: bool,
}
