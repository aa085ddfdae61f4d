//! The move engine: [`Rules`], [`GameState`] and the slide/merge algorithm.
//!
//! A move runs in fixed phases:
//!
//! 1. **prepare**: every tile forgets its merge sources and records its
//!    current position as `previous`;
//! 2. **traverse**: cells are visited starting from the edge the tiles are
//!    sliding towards, so tiles nearer that edge settle first;
//! 3. **slide / merge**: each tile slides to the farthest empty cell, or
//!    merges into an equal neighbour beyond it that has not already merged
//!    this move;
//! 4. **spawn / check**: if anything moved, a random tile appears and the
//!    game is over when no further move is possible.
//!
//! Merges are strictly pairwise: a row `[2, 2, 2, 0]` slid left becomes
//! `[4, 2, 0, 0]`, never `[6, ..]` or `[8, ..]`.

use rand::Rng;

use crate::error::{RulesError, StateError};
use crate::geom::{Direction, Point};
use crate::grid::{Grid, MAX_SIZE};
use crate::state::SavedGame;
use crate::tile::{Tile, is_tile_value};

/// Probability that a spawned tile is a 2 (otherwise it is a 4).
pub const SPAWN_TWO_PROBABILITY: f64 = 0.9;

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// The tunable parts of the ruleset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rules {
    /// Side length of the square grid.
    pub size: i32,
    /// Creating a tile of exactly this value wins the game.
    pub win_value: u32,
    /// Tiles placed on a fresh board.
    pub start_tiles: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            size: 4,
            win_value: 2048,
            start_tiles: 2,
        }
    }
}

impl Rules {
    /// Check that the rules describe a playable game.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.size < 1 {
            return Err(RulesError::BadSize(self.size));
        }
        if self.size > MAX_SIZE {
            return Err(RulesError::TooLarge {
                size: self.size,
                max: MAX_SIZE,
            });
        }
        if self.win_value < 4 || !is_tile_value(self.win_value) {
            return Err(RulesError::BadWinValue(self.win_value));
        }
        let cells = (self.size as usize) * (self.size as usize);
        if self.start_tiles > cells {
            return Err(RulesError::TooManyStartTiles {
                start_tiles: self.start_tiles,
                cells,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MoveOutcome
// ---------------------------------------------------------------------------

/// What a single move did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// At least one tile ended up in a different cell.
    pub moved: bool,
    /// Points scored: the sum of the values of all merged tiles.
    pub points: u64,
    /// Number of merges performed.
    pub merges: usize,
    /// Where the follow-up random tile was placed, if any.
    pub spawned: Option<Point>,
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// One game in progress: grid, score and terminal flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub grid: Grid,
    pub score: u64,
    pub won: bool,
    pub over: bool,
    pub keep_playing: bool,
    rules: Rules,
}

impl GameState {
    /// Start a fresh game with `rules.start_tiles` random tiles.
    pub fn new<R: Rng + ?Sized>(rules: Rules, rng: &mut R) -> Self {
        let mut state = Self::with_grid(rules, Grid::new(rules.size));
        for _ in 0..rules.start_tiles {
            state.add_random_tile(rng);
        }
        state
    }

    /// Wrap an existing grid in a game with zero score and no flags set.
    ///
    /// The grid's own size wins over `rules.size`.
    pub fn with_grid(rules: Rules, grid: Grid) -> Self {
        let rules = Rules {
            size: grid.size(),
            ..rules
        };
        Self {
            grid,
            score: 0,
            won: false,
            over: false,
            keep_playing: false,
            rules,
        }
    }

    /// Rebuild a game from a persisted snapshot.
    ///
    /// Fails when the snapshot's grid is malformed or its size differs from
    /// `rules.size`.
    pub fn restore(rules: Rules, saved: &SavedGame) -> Result<Self, StateError> {
        if saved.grid.size != rules.size {
            return Err(StateError::SizeMismatch {
                expected: rules.size,
                found: saved.grid.size,
            });
        }
        let grid = Grid::restore(&saved.grid)?;
        Ok(Self {
            grid,
            score: saved.score,
            won: saved.won,
            over: saved.over,
            keep_playing: saved.keep_playing,
            rules,
        })
    }

    /// Snapshot the game for persistence.
    pub fn serialize(&self) -> SavedGame {
        SavedGame {
            grid: self.grid.serialize(),
            score: self.score,
            over: self.over,
            won: self.won,
            keep_playing: self.keep_playing,
        }
    }

    /// The rules this game is played under.
    #[inline]
    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// Whether moves are refused: the game is over, or won and the player
    /// has not chosen to keep going.
    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.over || (self.won && !self.keep_playing)
    }

    /// Let the player continue after winning.
    pub fn keep_playing(&mut self) {
        self.keep_playing = true;
    }

    /// Place a 2 (90%) or a 4 (10%) on a random empty cell.
    ///
    /// Returns the chosen cell, or `None` if the board is full.
    pub fn add_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Point> {
        let pos = self.grid.random_available_cell(rng)?;
        let value = if rng.random_bool(SPAWN_TWO_PROBABILITY) {
            2
        } else {
            4
        };
        self.grid.insert_tile(Tile::new(pos, value));
        Some(pos)
    }

    /// Whether any move could change the board.
    pub fn moves_available(&self) -> bool {
        self.grid.cells_available() || self.tile_matches_available()
    }

    /// Whether two orthogonally adjacent tiles share a value.
    pub fn tile_matches_available(&self) -> bool {
        self.grid.tiles().any(|tile| {
            tile.pos
                .neighbors_4()
                .into_iter()
                .filter_map(|p| self.grid.cell_content(p))
                .any(|other| tile.can_merge_with(other))
        })
    }

    /// Play one move: slide, merge, spawn a tile and check for game over.
    ///
    /// A terminated game is left untouched and reports nothing moved.
    pub fn move_tiles<R: Rng + ?Sized>(&mut self, dir: Direction, rng: &mut R) -> MoveOutcome {
        if self.is_terminated() {
            log::debug!("move {dir} ignored: game terminated");
            return MoveOutcome::default();
        }

        let mut outcome = self.shift(dir);
        if outcome.moved {
            outcome.spawned = self.add_random_tile(rng);
            if !self.moves_available() {
                self.over = true;
                log::info!("game over with score {}", self.score);
            }
        }
        log::debug!(
            "move {dir}: moved={} points={} merges={}",
            outcome.moved,
            outcome.points,
            outcome.merges
        );
        outcome
    }

    /// Slide and merge tiles in `dir` without spawning a new tile.
    ///
    /// Updates score and the won flag. Does not check for termination.
    pub fn shift(&mut self, dir: Direction) -> MoveOutcome {
        let vector = dir.vector();
        let mut outcome = MoveOutcome::default();

        self.prepare_tiles();

        let (xs, ys) = self.build_traversals(vector);
        for &x in &xs {
            for &y in &ys {
                let cell = Point::new(x, y);
                let Some(tile) = self.grid.cell_content(cell) else {
                    continue;
                };
                let value = tile.value;

                let (farthest, next) = self.find_farthest_position(cell, vector);
                let mergeable = self
                    .grid
                    .cell_content(next)
                    .is_some_and(|n| n.merged_from.is_none() && n.can_merge_with(tile));

                let landed = if mergeable {
                    self.merge_into(cell, next);
                    outcome.points += u64::from(value * 2);
                    outcome.merges += 1;
                    next
                } else {
                    self.grid.move_tile(cell, farthest);
                    farthest
                };

                if landed != cell {
                    outcome.moved = true;
                }
            }
        }

        outcome
    }

    /// Clear merge sources and save positions before tiles start moving.
    fn prepare_tiles(&mut self) {
        for tile in self.grid.tiles_mut() {
            tile.merged_from = None;
            tile.save_position();
        }
    }

    /// Cell visiting order: columns and rows, each reversed when moving
    /// towards their high end.
    fn build_traversals(&self, vector: Point) -> (Vec<i32>, Vec<i32>) {
        let mut xs: Vec<i32> = (0..self.grid.size()).collect();
        let mut ys = xs.clone();
        if vector.x == 1 {
            xs.reverse();
        }
        if vector.y == 1 {
            ys.reverse();
        }
        (xs, ys)
    }

    /// Walk from `cell` along `vector` over empty cells. Returns the last
    /// empty cell reached and the cell just beyond it, which is either off
    /// the board or occupied.
    fn find_farthest_position(&self, cell: Point, vector: Point) -> (Point, Point) {
        let mut previous = cell;
        let mut next = cell + vector;
        while self.grid.cell_available(next) {
            previous = next;
            next = next + vector;
        }
        (previous, next)
    }

    /// Merge the tile at `from` into the equal tile at `into`.
    fn merge_into(&mut self, from: Point, into: Point) {
        let (Some(mut moving), Some(stationary)) =
            (self.grid.remove_tile(from), self.grid.remove_tile(into))
        else {
            return;
        };
        // The absorbed tile converges on the merge cell for animation.
        moving.update_position(into);
        let merged = Tile::merged(moving, stationary);
        let value = merged.value;
        self.grid.insert_tile(merged);

        self.score += u64::from(value);
        if value == self.rules.win_value && !self.won {
            self.won = true;
            log::info!("reached {value}, game won with score {}", self.score);
        }
    }
}
