//! Drawing the game onto a [`Screen`].
//!
//! The manager captures a [`Snapshot`] after every change and the
//! [`Actuator`] paints it. Nothing here reads game state directly, so the
//! screen always shows exactly what was last actuated.

use twenty48_core::{GameState, MAX_SIZE, Point, Tile, TileKind};
use twenty48_ui::{AttrMask, Cell, Screen, Style};

use crate::colors::*;

/// Width of one board cell, in terminal columns.
pub const CELL_WIDTH: i32 = 7;
/// Height of one board cell, in terminal rows.
pub const CELL_HEIGHT: i32 = 3;
/// Top-left corner of the board frame.
const BOARD_ORIGIN: Point = Point::new(1, 3);

const HELP_LINE: &str = "arrows/hjkl/wasd: move  r: restart  ?: help  q: quit";

const HELP_HEAD: &[&str] = &[
    "How to play",
    "",
    "Slide every tile with the arrow keys, hjkl or wasd,",
    "or drag across the window with the mouse.",
    "Two tiles with the same number merge into one.",
];

const HELP_TAIL: &[&str] = &[
    "",
    "r        start a new game",
    "c        keep playing after a win",
    "?        show this screen",
    "q, Esc   quit (the game is saved)",
    "",
    "Press any key to return.",
];

/// Status flags shown alongside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Metadata {
    pub score: u64,
    pub best_score: u64,
    pub won: bool,
    pub over: bool,
    pub terminated: bool,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    /// Row-major: `cells[y][x]`.
    pub cells: Vec<Vec<Option<Tile>>>,
    pub meta: Metadata,
    /// Points gained by the move that led here.
    pub score_added: u64,
}

impl Snapshot {
    pub fn capture(game: &GameState, best_score: u64, score_added: u64) -> Self {
        let size = game.grid.size();
        let cells = (0..size)
            .map(|y| {
                (0..size)
                    .map(|x| game.grid.cell_content(Point::new(x, y)).cloned())
                    .collect()
            })
            .collect();
        Self {
            cells,
            meta: Metadata {
                score: game.score,
                best_score,
                won: game.won,
                over: game.over,
                terminated: game.is_terminated(),
            },
            score_added,
        }
    }

    pub fn size(&self) -> i32 {
        self.cells.len() as i32
    }
}

/// Paints snapshots for a board of a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct Actuator {
    size: i32,
    /// Tiles above this get the dark "super" style.
    win_value: u32,
}

impl Actuator {
    /// Sizes outside `0..=MAX_SIZE` are clamped.
    pub fn new(size: i32, win_value: u32) -> Self {
        Self {
            size: size.clamp(0, MAX_SIZE),
            win_value,
        }
    }

    fn help_lines(&self) -> Vec<String> {
        let goal = format!("Reach the {} tile to win.", self.win_value);
        HELP_HEAD
            .iter()
            .map(|l| l.to_string())
            .chain([goal])
            .chain(HELP_TAIL.iter().map(|l| l.to_string()))
            .collect()
    }

    /// Board frame width and height, gaps included.
    fn board_extent(&self) -> (i32, i32) {
        (
            self.size * (CELL_WIDTH + 1) + 1,
            self.size * (CELL_HEIGHT + 1) + 1,
        )
    }

    /// Screen dimensions that fit the header, board and footer.
    pub fn screen_size(&self) -> (i32, i32) {
        let (bw, bh) = self.board_extent();
        let help = self.help_lines();
        let text_width = help
            .iter()
            .map(|l| l.len())
            .chain([HELP_LINE.len()])
            .max()
            .unwrap_or(0) as i32;
        let width = (BOARD_ORIGIN.x + bw).max(text_width + 2);
        let height = (BOARD_ORIGIN.y + bh + 3).max(help.len() as i32 + 2);
        (width, height)
    }

    /// Top-left screen cell of board position `p`.
    pub fn cell_origin(&self, p: Point) -> Point {
        BOARD_ORIGIN.shift(1 + p.x * (CELL_WIDTH + 1), 1 + p.y * (CELL_HEIGHT + 1))
    }

    pub fn draw(&self, screen: &mut Screen, snap: &Snapshot) {
        self.draw_header(screen, snap);
        self.draw_board(screen, snap);
        self.draw_footer(screen, &snap.meta);
    }

    fn draw_header(&self, screen: &mut Screen, snap: &Snapshot) {
        let title = Style::default()
            .with_fg(TITLE_FG)
            .with_attrs(AttrMask::BOLD);
        screen.print(Point::new(1, 0), "2048", title);

        let text = Style::default().with_fg(TEXT_FG);
        let mut at = screen.print(
            Point::new(1, 1),
            &format!("Score: {}", snap.meta.score),
            text,
        );
        if snap.score_added > 0 {
            at = screen.print(
                at,
                &format!(" +{}", snap.score_added),
                Style::default().with_fg(SCORE_ADDITION_FG),
            );
        }
        screen.print(
            at.shift(3, 0),
            &format!("Best: {}", snap.meta.best_score),
            text,
        );
    }

    fn draw_board(&self, screen: &mut Screen, snap: &Snapshot) {
        let (bw, bh) = self.board_extent();
        let frame = Cell::default().with_style(Style::default().with_bg(BOARD_BG));
        screen.fill_rect(BOARD_ORIGIN, bw, bh, frame);

        for (y, row) in snap.cells.iter().enumerate() {
            for (x, slot) in row.iter().enumerate() {
                let origin = self.cell_origin(Point::new(x as i32, y as i32));
                match slot {
                    Some(tile) => draw_tile(screen, origin, tile, self.win_value),
                    None => draw_empty(screen, origin),
                }
            }
        }
    }

    fn draw_footer(&self, screen: &mut Screen, meta: &Metadata) {
        let (_, bh) = self.board_extent();
        let y = BOARD_ORIGIN.y + bh + 1;
        if meta.terminated {
            let (msg, hint, fg) = if meta.over {
                ("Game over!", "  r: try again", LOSE_FG)
            } else {
                ("You win!", "  c: keep going  r: restart", WIN_FG)
            };
            let style = Style::default().with_fg(fg).with_attrs(AttrMask::BOLD);
            let at = screen.print(Point::new(1, y), msg, style);
            screen.print(at, hint, Style::default().with_fg(TEXT_FG));
        }
        screen.print(
            Point::new(1, y + 1),
            HELP_LINE,
            Style::default().with_fg(HELP_FG),
        );
    }

    /// Full-screen help overlay, centred on the screen.
    pub fn draw_help(&self, screen: &mut Screen) {
        let help = self.help_lines();
        let width = help.iter().map(|l| l.len()).max().unwrap_or(0) as i32;
        let x = ((screen.width() - width) / 2).max(1);
        let y = ((screen.height() - help.len() as i32) / 2).max(1);
        for (i, line) in help.iter().enumerate() {
            let style = if i == 0 {
                Style::default().with_attrs(AttrMask::BOLD)
            } else {
                Style::default()
            };
            screen.print(Point::new(x, y + i as i32), line, style);
        }
    }
}

/// Style for a tile: value colours, plus emphasis for what the last move did.
/// Tiles beyond `win_value` get the super style.
pub fn tile_style(tile: &Tile, win_value: u32) -> Style {
    let (mut bg, mut fg) = tile_colors(tile.value);
    let mut attrs = match tile.kind() {
        TileKind::New => AttrMask::BOLD,
        TileKind::Merged => AttrMask::REVERSE,
        TileKind::Moved => AttrMask::NONE,
    };
    if tile.value > win_value {
        (bg, fg) = (SUPER_BG, SUPER_FG);
        attrs = attrs | AttrMask::BOLD;
    }
    Style::default().with_fg(fg).with_bg(bg).with_attrs(attrs)
}

fn draw_tile(screen: &mut Screen, origin: Point, tile: &Tile, win_value: u32) {
    let style = tile_style(tile, win_value);
    screen.fill_rect(
        origin,
        CELL_WIDTH,
        CELL_HEIGHT,
        Cell::default().with_style(style),
    );
    let label = tile.value.to_string();
    let x = (CELL_WIDTH - label.len() as i32).max(0) / 2;
    screen.print(origin.shift(x, CELL_HEIGHT / 2), &label, style);
}

fn draw_empty(screen: &mut Screen, origin: Point) {
    let style = Style::default().with_fg(CELL_FG).with_bg(CELL_BG);
    screen.fill_rect(
        origin,
        CELL_WIDTH,
        CELL_HEIGHT,
        Cell::default().with_style(style),
    );
    screen.set(
        origin.shift(CELL_WIDTH / 2, CELL_HEIGHT / 2),
        Cell::default().with_char('·').with_style(style),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use twenty48_core::{Direction, Grid, Rules};

    fn render(snap: &Snapshot) -> Screen {
        let act = Actuator::new(snap.size(), 2048);
        let (w, h) = act.screen_size();
        let mut screen = Screen::new(w, h);
        act.draw(&mut screen, snap);
        screen
    }

    fn game(rows: &[&[u32]]) -> GameState {
        GameState::with_grid(Rules::default(), Grid::from_rows(rows))
    }

    #[test]
    fn header_shows_scores() {
        let mut g = game(&[&[2, 0, 0, 0], &[0; 4], &[0; 4], &[0; 4]]);
        g.score = 36;
        let screen = render(&Snapshot::capture(&g, 500, 8));
        assert!(screen.contains_text("2048"));
        assert!(screen.contains_text("Score: 36 +8"));
        assert!(screen.contains_text("Best: 500"));
        assert!(screen.contains_text(HELP_LINE));

        let screen = render(&Snapshot::capture(&g, 500, 0));
        assert!(!screen.contains_text("+"));
    }

    #[test]
    fn tiles_sit_in_their_cells() {
        let g = game(&[&[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 128, 0], &[0; 4]]);
        let snap = Snapshot::capture(&g, 0, 0);
        let screen = render(&snap);
        let act = Actuator::new(4, 2048);
        let origin = act.cell_origin(Point::new(2, 2));
        let label = origin.shift(2, 1);
        assert_eq!(screen.at(label).ch, '1');
        assert_eq!(screen.at(label.shift(1, 0)).ch, '2');
        assert_eq!(screen.at(label.shift(2, 0)).ch, '8');
        let (bg, _) = tile_colors(128);
        assert_eq!(screen.at(origin).style.bg, bg);
        // An empty neighbour is dotted.
        let empty = act.cell_origin(Point::new(0, 0));
        assert_eq!(screen.at(empty.shift(3, 1)).ch, '·');
    }

    #[test]
    fn new_and_merged_tiles_are_emphasised() {
        let mut g = game(&[&[2, 2, 0, 0], &[0; 4], &[0; 4], &[0; 4]]);
        let out = g.move_tiles(Direction::Left, &mut StdRng::seed_from_u64(5));
        let spawned = out.spawned.unwrap();
        let snap = Snapshot::capture(&g, 0, out.points);
        let screen = render(&snap);
        let act = Actuator::new(4, 2048);

        let merged = screen.at(act.cell_origin(Point::new(0, 0)));
        assert!(merged.style.attrs.contains(AttrMask::REVERSE));
        let fresh = screen.at(act.cell_origin(spawned));
        assert!(fresh.style.attrs.contains(AttrMask::BOLD));
        assert!(screen.contains_text("Score: 4 +4"));
    }

    #[test]
    fn super_tiles_use_dark_style() {
        let mut t = Tile::new(Point::new(0, 0), 4096);
        t.save_position();
        let style = tile_style(&t, 2048);
        assert_eq!(style.bg, SUPER_BG);
        assert!(style.attrs.contains(AttrMask::BOLD));

        let mut t = Tile::new(Point::new(0, 0), 2048);
        t.save_position();
        assert!(tile_style(&t, 2048).attrs.is_empty());

        // The threshold follows the configured goal.
        let mut t = Tile::new(Point::new(0, 0), 128);
        t.save_position();
        assert_eq!(tile_style(&t, 64).bg, SUPER_BG);
        assert_ne!(tile_style(&t, 2048).bg, SUPER_BG);
    }

    #[test]
    fn terminal_messages() {
        let mut g = game(&[&[2048, 0, 0, 0], &[0; 4], &[0; 4], &[0; 4]]);
        g.won = true;
        let screen = render(&Snapshot::capture(&g, 0, 0));
        assert!(screen.contains_text("You win!"));

        g.keep_playing();
        let screen = render(&Snapshot::capture(&g, 0, 0));
        assert!(!screen.contains_text("You win!"));

        g.over = true;
        let screen = render(&Snapshot::capture(&g, 0, 0));
        assert!(screen.contains_text("Game over!"));
    }

    #[test]
    fn help_fits_on_screen() {
        let act = Actuator::new(3, 2048);
        let (w, h) = act.screen_size();
        let mut screen = Screen::new(w, h);
        act.draw_help(&mut screen);
        assert!(screen.contains_text("How to play"));
        assert!(screen.contains_text("Reach the 2048 tile to win."));
        assert!(screen.contains_text("Press any key to return."));
    }

    #[test]
    fn help_names_the_configured_goal() {
        let act = Actuator::new(4, 512);
        let (w, h) = act.screen_size();
        let mut screen = Screen::new(w, h);
        act.draw_help(&mut screen);
        assert!(screen.contains_text("Reach the 512 tile to win."));
        assert!(!screen.contains_text("2048"));
    }

    #[test]
    fn oversized_boards_are_clamped() {
        let huge = Actuator::new(300_000_000, 2048).screen_size();
        assert_eq!(huge, Actuator::new(MAX_SIZE, 2048).screen_size());
        assert!(huge.0 < i32::from(u16::MAX) && huge.1 < i32::from(u16::MAX));
    }
}
