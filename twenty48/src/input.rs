//! Input mapping: keyboard and mouse messages to game [`Action`]s.

use twenty48_core::{Direction, Point};
use twenty48_ui::{Key, ModMask, MouseAction, Msg};

/// Something the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Restart,
    KeepPlaying,
    Help,
    Quit,
}

/// Unmodified key bindings.
const KEYMAP: &[(Key, Action)] = &[
    (Key::ArrowUp, Action::Move(Direction::Up)),
    (Key::ArrowRight, Action::Move(Direction::Right)),
    (Key::ArrowDown, Action::Move(Direction::Down)),
    (Key::ArrowLeft, Action::Move(Direction::Left)),
    // vim
    (Key::Char('k'), Action::Move(Direction::Up)),
    (Key::Char('l'), Action::Move(Direction::Right)),
    (Key::Char('j'), Action::Move(Direction::Down)),
    (Key::Char('h'), Action::Move(Direction::Left)),
    // wasd
    (Key::Char('w'), Action::Move(Direction::Up)),
    (Key::Char('d'), Action::Move(Direction::Right)),
    (Key::Char('s'), Action::Move(Direction::Down)),
    (Key::Char('a'), Action::Move(Direction::Left)),
    (Key::Char('r'), Action::Restart),
    (Key::Char('c'), Action::KeepPlaying),
    (Key::Char('?'), Action::Help),
    (Key::Char('q'), Action::Quit),
    (Key::Escape, Action::Quit),
];

/// Look up an unmodified key.
pub fn key_action(key: &Key) -> Option<Action> {
    KEYMAP.iter().find(|(k, _)| k == key).map(|&(_, a)| a)
}

/// Turns a stream of [`Msg`]s into actions, tracking mouse drags.
#[derive(Debug, Clone)]
pub struct InputMap {
    swipe_threshold: i32,
    drag_start: Option<Point>,
}

impl InputMap {
    pub fn new(swipe_threshold: i32) -> Self {
        Self {
            swipe_threshold,
            drag_start: None,
        }
    }

    /// Map one message. Returns `None` for anything without a binding.
    pub fn action(&mut self, msg: &Msg) -> Option<Action> {
        match msg {
            Msg::KeyDown { key, modifiers } => {
                if *key == Key::Char('c') && *modifiers == ModMask::CTRL {
                    return Some(Action::Quit);
                }
                // '?' usually arrives with shift held.
                if *key == Key::Char('?') && modifiers.contains(ModMask::SHIFT) {
                    return Some(Action::Help);
                }
                if !modifiers.is_empty() {
                    return None;
                }
                key_action(key)
            }
            Msg::Mouse { action, pos, .. } => self.mouse(*action, *pos),
            Msg::Quit => Some(Action::Quit),
            Msg::Init => None,
        }
    }

    fn mouse(&mut self, action: MouseAction, pos: Point) -> Option<Action> {
        match action {
            MouseAction::Main => {
                self.drag_start = Some(pos);
                None
            }
            MouseAction::Release => {
                let start = self.drag_start.take()?;
                self.swipe(pos - start)
            }
            MouseAction::Move => None,
        }
    }

    fn swipe(&self, delta: Point) -> Option<Action> {
        let (adx, ady) = (delta.x.abs(), delta.y.abs());
        if adx.max(ady) <= self.swipe_threshold {
            return None;
        }
        let dir = if adx > ady {
            if delta.x > 0 { Direction::Right } else { Direction::Left }
        } else if delta.y > 0 {
            Direction::Down
        } else {
            Direction::Up
        };
        Some(Action::Move(dir))
    }
}
