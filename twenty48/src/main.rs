use anyhow::{Result, anyhow};
use clap::Parser;

use twenty48_crossterm::CrosstermDriver;
use twenty48_lib::{Cli, Config, FileStorage, GameManager, MemoryStorage, Storage, logging};
use twenty48_ui::{App, AppConfig};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli)?;
    let _log_guard = logging::init(&config);
    log::info!("twenty48 {} starting", env!("CARGO_PKG_VERSION"));

    match config.storage_path.clone() {
        Some(path) => play(config, FileStorage::open(path)),
        None => play(config, MemoryStorage::new()),
    }
}

fn play<S: Storage>(config: Config, storage: S) -> Result<()> {
    let model = GameManager::new(config, storage);
    let (width, height) = model.screen_size();
    let mut app = App::new(AppConfig {
        model,
        driver: CrosstermDriver::new(),
        width,
        height,
    });
    app.run().map_err(|e| anyhow!("terminal error: {e}"))?;
    log::info!("final score {}", app.model().game().score);
    Ok(())
}
