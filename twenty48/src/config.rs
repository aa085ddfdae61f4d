//! Configuration: a TOML file merged with command-line overrides.
//!
//! The file lives at `<config dir>/twenty48/config.toml` unless `--config`
//! names another one. A missing default file means defaults; a file that
//! fails to parse is reported on stderr and ignored.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use twenty48_core::Rules;

use crate::cli::Cli;

const APP_DIR: &str = "twenty48";

/// Effective configuration after merging file and CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rules: Rules,
    /// Minimum drag distance, in terminal cells, that counts as a swipe.
    pub swipe_threshold: i32,
    /// Storage file; `None` keeps everything in memory.
    pub storage_path: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub seed: Option<u64>,
    /// Ignore any saved game on start.
    pub new_game: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            swipe_threshold: 1,
            storage_path: default_data_dir().map(|d| d.join("storage.json")),
            log_level: "info".to_string(),
            log_dir: default_data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("logs"),
            seed: None,
            new_game: false,
        }
    }
}

/// On-disk layout. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    size: Option<i32>,
    win_value: Option<u32>,
    start_tiles: Option<usize>,
    swipe_threshold: Option<i32>,
    storage: Option<FileStorage>,
    logging: Option<FileLogging>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileStorage {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileLogging {
    level: Option<String>,
    dir: Option<String>,
}

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_DIR))
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

impl Config {
    /// Default config file path: `<config dir>/twenty48/config.toml`.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Build the effective configuration for a run.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                Self::parse_file(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Self::load_default_file(),
        };

        let mut config = Self::default();
        config.apply_file(file);
        config.apply_cli(cli);
        config
            .rules
            .validate()
            .context("invalid game rules")?;
        if config.swipe_threshold < 0 {
            anyhow::bail!("swipe_threshold must not be negative");
        }
        Ok(config)
    }

    /// Parse TOML text, for tests and explicit `--config` files.
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut config = Self::default();
        config.apply_file(Self::parse_file(text)?);
        Ok(config)
    }

    fn parse_file(text: &str) -> Result<FileConfig> {
        Ok(toml::from_str(text)?)
    }

    fn load_default_file() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };
        Self::read_lenient(&path)
    }

    fn read_lenient(path: &Path) -> FileConfig {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse_file(&text).unwrap_or_else(|e| {
                eprintln!("Warning: ignoring {}: {e:#}", path.display());
                FileConfig::default()
            }),
            Err(_) => FileConfig::default(),
        }
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(size) = file.size {
            self.rules.size = size;
        }
        if let Some(v) = file.win_value {
            self.rules.win_value = v;
        }
        if let Some(n) = file.start_tiles {
            self.rules.start_tiles = n;
        }
        if let Some(t) = file.swipe_threshold {
            self.swipe_threshold = t;
        }
        if let Some(path) = file.storage.and_then(|s| s.path) {
            self.storage_path = Some(expand_home(&path));
        }
        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = level;
            }
            if let Some(dir) = logging.dir {
                self.log_dir = expand_home(&dir);
            }
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(size) = cli.size {
            self.rules.size = size;
        }
        if let Some(v) = cli.win_value {
            self.rules.win_value = v;
        }
        if let Some(path) = &cli.storage {
            self.storage_path = Some(path.clone());
        }
        if cli.no_save {
            self.storage_path = None;
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        self.new_game |= cli.new_game;
    }
}
