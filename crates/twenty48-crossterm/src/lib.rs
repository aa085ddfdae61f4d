//! Crossterm terminal driver for twenty48.
//!
//! Provides a [`CrosstermDriver`] that implements [`twenty48_ui::Driver`]:
//! raw mode plus the alternate screen, key and mouse input translated into
//! [`Msg`]s, and diff frames written with queued cursor moves.

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute, queue,
    style::{self, Attribute, Color as CtColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use twenty48_core::Point;
use twenty48_ui::{AttrMask, Color, Driver, Frame, Key, ModMask, MouseAction, Msg};

/// How long a poll waits for the first event.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Maps a twenty48 [`Color`] to a crossterm colour.
fn to_ct_color(c: Color) -> CtColor {
    match c {
        Color::Default => CtColor::Reset,
        Color::Rgb(r, g, b) => CtColor::Rgb { r, g, b },
    }
}

/// Maps crossterm key modifiers to a [`ModMask`].
fn to_mod_mask(mods: KeyModifiers) -> ModMask {
    let mut m = ModMask::NONE;
    if mods.contains(KeyModifiers::SHIFT) {
        m = m | ModMask::SHIFT;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        m = m | ModMask::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) {
        m = m | ModMask::ALT;
    }
    if mods.contains(KeyModifiers::META) {
        m = m | ModMask::META;
    }
    m
}

/// Maps a crossterm [`KeyCode`] to a [`Key`].
fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        _ => None,
    }
}

/// Terminal cursor position for a screen point, if it is addressable.
fn to_cursor(p: Point) -> Option<(u16, u16)> {
    Some((u16::try_from(p.x).ok()?, u16::try_from(p.y).ok()?))
}

/// Translate one terminal event. Key releases and repeats are dropped
/// so each physical press yields exactly one message.
fn translate(ev: Event) -> Option<Msg> {
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => to_key(code).map(|key| Msg::key_mod(key, to_mod_mask(modifiers))),
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers,
        }) => {
            let action = match kind {
                MouseEventKind::Down(MouseButton::Left) => MouseAction::Main,
                MouseEventKind::Up(MouseButton::Left) => MouseAction::Release,
                MouseEventKind::Drag(_) | MouseEventKind::Moved => MouseAction::Move,
                _ => return None,
            };
            Some(Msg::Mouse {
                action,
                pos: Point::new(i32::from(column), i32::from(row)),
                modifiers: to_mod_mask(modifiers),
            })
        }
        _ => None,
    }
}

/// A terminal back-end using crossterm.
pub struct CrosstermDriver {
    mouse_enabled: bool,
}

impl CrosstermDriver {
    /// Create a new driver.
    pub fn new() -> Self {
        Self {
            mouse_enabled: true,
        }
    }

    /// Configure whether mouse events (drag-to-swipe) are captured.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for CrosstermDriver {
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if self.mouse_enabled {
            execute!(stdout, event::EnableMouseCapture)?;
        }
        log::debug!("terminal initialised (mouse: {})", self.mouse_enabled);
        Ok(())
    }

    fn poll_msgs(&mut self, tx: &Sender<Msg>) -> Result<(), Box<dyn std::error::Error>> {
        if !event::poll(POLL_INTERVAL)? {
            return Ok(());
        }
        while event::poll(Duration::ZERO)? {
            if let Some(msg) = translate(event::read()?) {
                tx.send(msg).ok();
            }
        }
        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = io::stdout().lock();

        for fc in &frame.cells {
            let (p, cell) = (fc.pos, fc.cell);
            let Some((col, row)) = to_cursor(p) else {
                continue;
            };
            queue!(
                stdout,
                cursor::MoveTo(col, row),
                SetForegroundColor(to_ct_color(cell.style.fg)),
                SetBackgroundColor(to_ct_color(cell.style.bg))
            )?;

            let attrs = cell.style.attrs;
            if attrs.contains(AttrMask::BOLD) {
                queue!(stdout, style::SetAttribute(Attribute::Bold))?;
            }
            if attrs.contains(AttrMask::REVERSE) {
                queue!(stdout, style::SetAttribute(Attribute::Reverse))?;
            }
            if attrs.contains(AttrMask::DIM) {
                queue!(stdout, style::SetAttribute(Attribute::Dim))?;
            }

            write!(stdout, "{}", cell.ch)?;

            if !attrs.is_empty() {
                queue!(stdout, style::SetAttribute(Attribute::Reset))?;
            }
        }

        stdout.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        let mut stdout = io::stdout();
        if self.mouse_enabled {
            let _ = execute!(stdout, event::DisableMouseCapture);
        }
        let _ = execute!(
            stdout,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
