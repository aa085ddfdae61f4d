//! Log setup: `log` records go to a daily-rotated file, never the terminal
//! the game is drawn on.
//!
//! Precedence for the filter: `RUST_LOG` > config file > "info".

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

pub const LOG_FILE_PREFIX: &str = "twenty48.log";

/// Install the global subscriber. Keep the returned guard alive until exit
/// so buffered lines get flushed.
///
/// Returns `None`, with a warning on stderr, when the log directory cannot
/// be created or a subscriber is already installed. The game runs either way.
pub fn init(config: &Config) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(&config.log_dir) {
        eprintln!(
            "Warning: could not create log directory {}: {e}",
            config.log_dir.display()
        );
        return None;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.log_level)));
    let (writer, guard) = tracing_appender::non_blocking(appender(&config.log_dir));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init();
    match result {
        Ok(()) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e}");
            None
        }
    }
}

fn appender(dir: &Path) -> tracing_appender::rolling::RollingFileAppender {
    tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX)
}

/// A bare level applies to our own crates only; anything else is passed
/// through as a full filter directive.
fn default_directive(level: &str) -> String {
    match level.trim().to_ascii_lowercase().as_str() {
        l @ ("trace" | "debug" | "info" | "warn" | "error" | "off") => {
            format!("twenty48_lib={l},twenty48_core={l},twenty48_ui={l},twenty48_crossterm={l}")
        }
        _ => level.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_levels_scope_to_our_crates() {
        let d = default_directive("Debug");
        assert!(d.contains("twenty48_core=debug"));
        assert!(d.contains("twenty48_lib=debug"));
        assert_eq!(default_directive("warn,twenty48_core=trace"), "warn,twenty48_core=trace");
    }

    #[test]
    fn directives_parse() {
        for level in ["info", "trace", "off"] {
            assert!(EnvFilter::try_new(default_directive(level)).is_ok());
        }
    }
}
