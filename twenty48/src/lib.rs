//! twenty48: the 2048 sliding-tile puzzle in a terminal.
//!
//! The rules live in `twenty48-core`; this crate adds everything around
//! them: key and mouse input, drawing, persistence of the best score and
//! the game in progress, configuration, and logging.

pub mod cli;
pub mod colors;
pub mod config;
pub mod input;
pub mod logging;
pub mod manager;
pub mod render;
pub mod storage;

pub use cli::Cli;
pub use config::Config;
pub use input::{Action, InputMap};
pub use manager::GameManager;
pub use render::{Actuator, Metadata, Snapshot};
pub use storage::{FileStorage, MemoryStorage, Storage};
