//! Command-line arguments. Every flag overrides the matching config-file key.

use std::path::PathBuf;

use clap::Parser;

/// Slide tiles, merge equal numbers, reach 2048.
#[derive(Parser, Debug, Default)]
#[command(name = "twenty48", version, about, long_about = None)]
pub struct Cli {
    /// Config file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Side length of the board, 1 to 16
    #[arg(long)]
    pub size: Option<i32>,

    /// Tile value that wins the game (a power of two)
    #[arg(long)]
    pub win_value: Option<u32>,

    /// Where to keep the best score and the saved game
    #[arg(long, value_name = "PATH", conflicts_with = "no_save")]
    pub storage: Option<PathBuf>,

    /// Keep nothing on disk: no saved game, no best score
    #[arg(long)]
    pub no_save: bool,

    /// Seed for tile spawns, for reproducible games
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start a new game even if a saved one exists
    #[arg(long = "new")]
    pub new_game: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "twenty48",
            "--size",
            "5",
            "--win-value",
            "4096",
            "--seed",
            "9",
            "--new",
        ])
        .unwrap();
        assert_eq!(cli.size, Some(5));
        assert_eq!(cli.win_value, Some(4096));
        assert_eq!(cli.seed, Some(9));
        assert!(cli.new_game);
        assert!(!cli.no_save);
    }

    #[test]
    fn storage_conflicts_with_no_save() {
        let res = Cli::try_parse_from(["twenty48", "--storage", "x.json", "--no-save"]);
        assert!(res.is_err());
    }
}
