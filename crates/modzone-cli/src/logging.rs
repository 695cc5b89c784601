//! Logging setup
//!
//! Logs go to stderr, or to `log_file` when one is configured. The level
//! comes from `MODZONE_LOG` (default `warn`).

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::EnvFilter;

use modzone_core::Config;

/// Environment variable holding the log level
const LOG_LEVEL_VAR: &str = "MODZONE_LOG";

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("modzone_core={},modzone_cli={}", level, level))
}

/// Install the global tracing subscriber
pub fn init(config: &Config) {
    let log_level = std::env::var(LOG_LEVEL_VAR).unwrap_or_else(|_| "warn".to_string());

    if let Some(ref log_path) = config.log_file {
        let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
                return;
            }
        };

        // Ignore error if already initialized
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter(&log_level))
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(log_file))
            .try_init();

        info!("logging to {:?}", log_path);
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter(&log_level))
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
