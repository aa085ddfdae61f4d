//! The [`Grid`] type: a square board of optional [`Tile`]s.
//!
//! The grid is the single owner of its tiles and the single source of truth
//! for where they are: every mutator keeps `tile.pos` equal to the cell the
//! tile is stored in. Queries outside the board resolve to "empty" instead of
//! failing, since the move engine routinely probes one step past the edge.

use rand::Rng;

use crate::error::StateError;
use crate::geom::Point;
use crate::state::{GridState, TileState};
use crate::tile::{Tile, is_tile_value};

/// Largest supported side length.
pub const MAX_SIZE: i32 = 16;

/// A square `size`×`size` board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Option<Tile>>,
    size: i32,
}

impl Grid {
    /// Create an empty grid. The size is clamped to `0..=MAX_SIZE`.
    pub fn new(size: i32) -> Self {
        let size = size.clamp(0, MAX_SIZE);
        let n = size as usize;
        Self {
            cells: vec![None; n * n],
            size,
        }
    }

    /// Build a grid from row-major values, `0` meaning empty.
    ///
    /// Mostly useful for setting up positions in tests and tools. Rows are
    /// truncated or padded to a square of side `rows.len()`.
    pub fn from_rows(rows: &[&[u32]]) -> Self {
        let mut grid = Grid::new(rows.len() as i32);
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate().take(rows.len()) {
                if value != 0 {
                    grid.insert_tile(Tile::new(Point::new(x as i32, y as i32), value));
                }
            }
        }
        grid
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if self.within_bounds(p) {
            Some((p.y * self.size + p.x) as usize)
        } else {
            None
        }
    }

    /// Whether `p` lies on the board.
    #[inline]
    pub fn within_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.size && p.y >= 0 && p.y < self.size
    }

    /// The tile at `p`, or `None` if the cell is empty or off the board.
    #[inline]
    pub fn cell_content(&self, p: Point) -> Option<&Tile> {
        self.index(p).and_then(|i| self.cells[i].as_ref())
    }

    /// Whether `p` is on the board and holds a tile.
    #[inline]
    pub fn cell_occupied(&self, p: Point) -> bool {
        self.cell_content(p).is_some()
    }

    /// Whether `p` is on the board and empty.
    #[inline]
    pub fn cell_available(&self, p: Point) -> bool {
        self.index(p).is_some_and(|i| self.cells[i].is_none())
    }

    /// Whether any cell is empty.
    pub fn cells_available(&self) -> bool {
        self.cells.iter().any(Option::is_none)
    }

    /// All empty cells, row-major.
    pub fn available_cells(&self) -> Vec<Point> {
        self.positions().filter(|&p| self.cell_available(p)).collect()
    }

    /// Pick an empty cell uniformly at random, or `None` if the board is full.
    pub fn random_available_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Point> {
        let cells = self.available_cells();
        if cells.is_empty() {
            return None;
        }
        Some(cells[rng.random_range(0..cells.len())])
    }

    /// Store `tile` at its own position, replacing whatever was there.
    ///
    /// Tiles positioned off the board are dropped.
    pub fn insert_tile(&mut self, tile: Tile) {
        if let Some(i) = self.index(tile.pos) {
            self.cells[i] = Some(tile);
        }
    }

    /// Clear the cell at `p`, returning the tile it held.
    pub fn remove_tile(&mut self, p: Point) -> Option<Tile> {
        let i = self.index(p)?;
        self.cells[i].take()
    }

    /// Move the tile at `from` to `to`, updating its position.
    ///
    /// Does nothing when `from` is empty or `to` is off the board.
    pub fn move_tile(&mut self, from: Point, to: Point) {
        if from == to || !self.within_bounds(to) {
            return;
        }
        if let Some(mut tile) = self.remove_tile(from) {
            tile.update_position(to);
            self.insert_tile(tile);
        }
    }

    /// Row-major iterator over every position on the board.
    pub fn positions(&self) -> impl Iterator<Item = Point> + use<> {
        let n = self.size;
        (0..n).flat_map(move |y| (0..n).map(move |x| Point::new(x, y)))
    }

    /// Row-major iterator over the tiles on the board.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten()
    }

    /// Mutable iterator over the tiles on the board.
    ///
    /// Callers must not change `pos`; use [`move_tile`](Grid::move_tile).
    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.cells.iter_mut().flatten()
    }

    /// Number of tiles on the board.
    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    /// The largest tile value, or 0 on an empty board.
    pub fn max_value(&self) -> u32 {
        self.tiles().map(|t| t.value).max().unwrap_or(0)
    }

    /// Tile values as row-major rows, `0` meaning empty.
    pub fn rows(&self) -> Vec<Vec<u32>> {
        (0..self.size)
            .map(|y| {
                (0..self.size)
                    .map(|x| self.cell_content(Point::new(x, y)).map_or(0, |t| t.value))
                    .collect()
            })
            .collect()
    }

    /// Snapshot sizes and values for persistence.
    pub fn serialize(&self) -> GridState {
        let cells = (0..self.size)
            .map(|x| {
                (0..self.size)
                    .map(|y| {
                        self.cell_content(Point::new(x, y)).map(|t| TileState {
                            position: t.pos,
                            value: t.value,
                        })
                    })
                    .collect()
            })
            .collect();
        GridState {
            size: self.size,
            cells,
        }
    }

    /// Rebuild a grid from a snapshot, checking every invariant.
    pub fn restore(state: &GridState) -> Result<Grid, StateError> {
        let size = state.size;
        if !(1..=MAX_SIZE).contains(&size) {
            return Err(StateError::BadSize(size));
        }
        if state.cells.len() != size as usize
            || state.cells.iter().any(|col| col.len() != size as usize)
        {
            return Err(StateError::BadShape { size });
        }

        let mut grid = Grid::new(size);
        for (x, col) in state.cells.iter().enumerate() {
            for (y, cell) in col.iter().enumerate() {
                let Some(stored) = cell else { continue };
                let at = Point::new(x as i32, y as i32);
                if stored.position != at {
                    return Err(StateError::PositionMismatch {
                        cell: at,
                        stored: stored.position,
                    });
                }
                if !is_tile_value(stored.value) {
                    return Err(StateError::BadValue {
                        at,
                        value: stored.value,
                    });
                }
                grid.insert_tile(Tile::new(at, stored.value));
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn grid_new_is_empty() {
        let g = Grid::new(4);
        assert_eq!(g.size(), 4);
        assert_eq!(g.tile_count(), 0);
        assert_eq!(g.available_cells().len(), 16);
        assert!(g.cells_available());
    }

    #[test]
    fn bounds_and_out_of_range_queries() {
        let g = Grid::from_rows(&[&[2, 0], &[0, 0]]);
        assert!(g.within_bounds(Point::new(1, 1)));
        assert!(!g.within_bounds(Point::new(2, 0)));
        assert!(!g.within_bounds(Point::new(0, -1)));
        // Off-board cells are neither occupied nor available.
        assert!(g.cell_content(Point::new(-1, 0)).is_none());
        assert!(!g.cell_available(Point::new(5, 5)));
        assert!(!g.cell_occupied(Point::new(5, 5)));
        assert!(g.cell_occupied(Point::new(0, 0)));
        assert!(!g.cell_available(Point::new(0, 0)));
    }

    #[test]
    fn available_cells_are_row_major() {
        let g = Grid::from_rows(&[&[2, 0, 0], &[0, 4, 0], &[0, 0, 8]]);
        assert_eq!(
            g.available_cells(),
            vec![
                Point::new(1, 0),
                Point::new(2, 0),
                Point::new(0, 1),
                Point::new(2, 1),
                Point::new(0, 2),
                Point::new(1, 2),
            ]
        );
    }

    #[test]
    fn random_cell_is_empty_or_none_when_full() {
        let mut rng = StdRng::seed_from_u64(7);
        let g = Grid::from_rows(&[&[2, 0], &[4, 8]]);
        for _ in 0..20 {
            assert_eq!(g.random_available_cell(&mut rng), Some(Point::new(1, 0)));
        }
        let full = Grid::from_rows(&[&[2, 4], &[4, 8]]);
        assert_eq!(full.random_available_cell(&mut rng), None);
    }

    #[test]
    fn insert_remove_and_move_keep_positions_in_sync() {
        let mut g = Grid::new(4);
        g.insert_tile(Tile::new(Point::new(1, 1), 2));
        g.move_tile(Point::new(1, 1), Point::new(3, 1));
        assert!(g.cell_available(Point::new(1, 1)));
        assert_eq!(g.cell_content(Point::new(3, 1)).unwrap().pos, Point::new(3, 1));

        let t = g.remove_tile(Point::new(3, 1)).unwrap();
        assert_eq!(t.value, 2);
        assert_eq!(g.tile_count(), 0);
        assert!(g.remove_tile(Point::new(9, 9)).is_none());

        for p in g.positions() {
            if let Some(t) = g.cell_content(p) {
                assert_eq!(t.pos, p);
            }
        }
    }

    #[test]
    fn insert_off_board_is_dropped() {
        let mut g = Grid::new(2);
        g.insert_tile(Tile::new(Point::new(2, 0), 2));
        assert_eq!(g.tile_count(), 0);
    }

    #[test]
    fn rows_and_max_value() {
        let g = Grid::from_rows(&[&[2, 0], &[0, 16]]);
        assert_eq!(g.rows(), vec![vec![2, 0], vec![0, 16]]);
        assert_eq!(g.max_value(), 16);
        assert_eq!(Grid::new(3).max_value(), 0);
    }

    #[test]
    fn serialize_restore_round_trip() {
        let g = Grid::from_rows(&[&[2, 0, 4], &[0, 8, 0], &[0, 0, 2048]]);
        let state = g.serialize();
        assert_eq!(state.size, 3);
        // column-major storage
        assert_eq!(state.cells[2][0].unwrap().value, 4);
        assert!(state.cells[0][1].is_none());
        let back = Grid::restore(&state).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn restore_rejects_malformed_state() {
        let mut state = Grid::from_rows(&[&[2, 0], &[0, 0]]).serialize();
        state.cells[0][0].as_mut().unwrap().value = 3;
        assert!(matches!(
            Grid::restore(&state),
            Err(StateError::BadValue { value: 3, .. })
        ));

        let mut state = Grid::from_rows(&[&[2, 0], &[0, 0]]).serialize();
        state.cells[0][0].as_mut().unwrap().position = Point::new(1, 1);
        assert!(matches!(
            Grid::restore(&state),
            Err(StateError::PositionMismatch { .. })
        ));

        let mut state = Grid::new(2).serialize();
        state.cells.pop();
        assert_eq!(Grid::restore(&state), Err(StateError::BadShape { size: 2 }));

        let state = GridState {
            size: 0,
            cells: vec![],
        };
        assert_eq!(Grid::restore(&state), Err(StateError::BadSize(0)));

        let state = GridState {
            size: 100_000,
            cells: vec![],
        };
        assert_eq!(Grid::restore(&state), Err(StateError::BadSize(100_000)));
    }

    #[test]
    fn restore_rejects_tiles_too_large_to_double() {
        let mut state = Grid::from_rows(&[&[2, 2], &[0, 0]]).serialize();
        state.cells[0][0].as_mut().unwrap().value = 1 << 31;
        state.cells[1][0].as_mut().unwrap().value = 1 << 31;
        assert!(matches!(
            Grid::restore(&state),
            Err(StateError::BadValue { value: 0x8000_0000, .. })
        ));
    }
}
