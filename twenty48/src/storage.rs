//! Persistence: a small string key/value store holding the best score and
//! the saved game.
//!
//! Reads never fail: a missing or malformed value reads as "nothing saved".
//! Write failures are logged and otherwise ignored.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use twenty48_core::SavedGame;

pub const BEST_SCORE_KEY: &str = "bestScore";
pub const GAME_STATE_KEY: &str = "gameState";

/// Key/value persistence with typed accessors for the two keys the game uses.
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: String);
    fn remove_item(&mut self, key: &str);

    /// Best score so far, 0 when unset or unreadable.
    fn best_score(&self) -> u64 {
        self.get_item(BEST_SCORE_KEY)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    }

    fn set_best_score(&mut self, score: u64) {
        self.set_item(BEST_SCORE_KEY, score.to_string());
    }

    /// The saved game, or `None` when absent or undecodable.
    fn game_state(&self) -> Option<SavedGame> {
        let blob = self.get_item(GAME_STATE_KEY)?;
        match serde_json::from_str(&blob) {
            Ok(saved) => Some(saved),
            Err(e) => {
                log::warn!("discarding unreadable saved game: {e}");
                None
            }
        }
    }

    fn set_game_state(&mut self, state: &SavedGame) {
        match serde_json::to_string(state) {
            Ok(blob) => self.set_item(GAME_STATE_KEY, blob),
            Err(e) => log::warn!("could not encode game state: {e}"),
        }
    }

    fn clear_game_state(&mut self) {
        self.remove_item(GAME_STATE_KEY);
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// Storage that lives and dies with the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) {
        self.items.insert(key.to_string(), value);
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

/// Storage backed by one JSON object in a file, rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open `path`, starting empty if it is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = match Self::read(&path) {
            Ok(items) => items,
            Err(e) => {
                if path.exists() {
                    log::warn!("ignoring storage file: {e:#}");
                }
                BTreeMap::new()
            }
        };
        log::debug!("storage at {} with {} keys", path.display(), items.len());
        Self { path, items }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<BTreeMap<String, String>> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("decoding {}", path.display()))
    }

    /// Write to a sibling temp file, then rename over the real one.
    fn write(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let text = serde_json::to_string_pretty(&self.items)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, text).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.write() {
            log::warn!("could not save storage: {e:#}");
        }
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) {
        if self.items.get(key) == Some(&value) {
            return;
        }
        self.items.insert(key.to_string(), value);
        self.persist();
    }

    fn remove_item(&mut self, key: &str) {
        if self.items.remove(key).is_some() {
            self.persist();
        }
    }
}
