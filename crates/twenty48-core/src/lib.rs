//! **twenty48-core**: the 2048 game engine.
//!
//! This crate holds everything with rules in it and nothing that does I/O:
//! geometry, the [`Tile`] entity, the square [`Grid`] that owns the tiles,
//! and the move engine on [`GameState`] that slides and merges tiles in
//! response to a [`Direction`].
//!
//! ```
//! use rand::{SeedableRng, rngs::StdRng};
//! use twenty48_core::{Direction, GameState, Grid, Rules};
//!
//! let rows: &[&[u32]] = &[&[2, 2, 4, 0], &[0; 4], &[0; 4], &[0; 4]];
//! let mut game = GameState::with_grid(Rules::default(), Grid::from_rows(rows));
//! let outcome = game.move_tiles(Direction::Left, &mut StdRng::seed_from_u64(1));
//! assert!(outcome.moved);
//! assert_eq!(game.score, 4);
//! ```

pub mod engine;
pub mod error;
pub mod geom;
pub mod grid;
pub mod state;
pub mod tile;

pub use engine::{GameState, MoveOutcome, Rules, SPAWN_TWO_PROBABILITY};
pub use error::{RulesError, StateError};
pub use geom::{Direction, Point};
pub use grid::{Grid, MAX_SIZE};
pub use state::{GridState, SavedGame, TileState};
pub use tile::{MAX_TILE_VALUE, Tile, TileKind};
