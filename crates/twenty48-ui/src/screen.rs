//! The character [`Screen`] a model draws into, and the [`Frame`] diffs a
//! driver flushes.

use twenty48_core::Point;

use crate::style::Style;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A styled character cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Cell {
    /// Set the character (builder).
    #[inline]
    pub const fn with_char(mut self, ch: char) -> Self {
        self.ch = ch;
        self
    }

    /// Set the style (builder).
    #[inline]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// A fixed-size, row-major buffer of [`Cell`]s.
///
/// Writes outside the buffer are silently clipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Screen {
    cells: Vec<Cell>,
    width: i32,
    height: i32,
}

impl Screen {
    /// Create a blank screen.
    pub fn new(width: i32, height: i32) -> Self {
        let (w, h) = (width.max(0), height.max(0));
        Self {
            cells: vec![Cell::default(); (w * h) as usize],
            width: w,
            height: h,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height {
            Some((p.y * self.width + p.x) as usize)
        } else {
            None
        }
    }

    /// Read the cell at `p`. Returns `Cell::default()` if `p` is outside.
    pub fn at(&self, p: Point) -> Cell {
        self.index(p).map(|i| self.cells[i]).unwrap_or_default()
    }

    /// Set the cell at `p`. No-op if `p` is outside.
    pub fn set(&mut self, p: Point, cell: Cell) {
        if let Some(i) = self.index(p) {
            self.cells[i] = cell;
        }
    }

    /// Fill every cell with `cell`.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Fill the `w`×`h` rectangle whose top-left corner is `p`.
    pub fn fill_rect(&mut self, p: Point, w: i32, h: i32, cell: Cell) {
        for y in p.y..p.y + h {
            for x in p.x..p.x + w {
                self.set(Point::new(x, y), cell);
            }
        }
    }

    /// Write `text` left to right starting at `p`. Returns the point just
    /// after the last character.
    pub fn print(&mut self, p: Point, text: &str, style: Style) -> Point {
        let mut at = p;
        for ch in text.chars() {
            self.set(at, Cell { ch, style });
            at = at.shift(1, 0);
        }
        at
    }

    /// The text of row `y` with trailing spaces removed. Handy in tests.
    pub fn line(&self, y: i32) -> String {
        let s: String = (0..self.width)
            .map(|x| self.at(Point::new(x, y)).ch)
            .collect();
        s.trim_end().to_string()
    }

    /// Whether any row contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.line(y).contains(needle))
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// A single cell that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameCell {
    pub cell: Cell,
    pub pos: Point,
}

/// A set of cell changes.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

/// Compute the cells of `curr` that differ from `prev`.
pub fn compute_frame(prev: &Screen, curr: &Screen) -> Frame {
    let mut cells = Vec::new();
    for y in 0..curr.height {
        for x in 0..curr.width {
            let pos = Point::new(x, y);
            let cell = curr.at(pos);
            if prev.at(pos) != cell {
                cells.push(FrameCell { cell, pos });
            }
        }
    }
    Frame {
        cells,
        width: curr.width,
        height: curr.height,
    }
}
