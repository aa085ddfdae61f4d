//! **twenty48-ui**: the terminal-facing runtime for twenty48.
//!
//! Provides input messages, a styled character screen with frame diffing,
//! and the Elm-architecture loop that ties a [`Model`] to a [`Driver`].

pub mod app;
pub mod messages;
pub mod screen;
pub mod style;

pub use app::{App, AppConfig, Driver, Effect, Model};
pub use messages::{Key, ModMask, MouseAction, Msg};
pub use screen::{Cell, Frame, FrameCell, Screen, compute_frame};
pub use style::{AttrMask, Color, Style};
