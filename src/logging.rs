use crate::config::Config;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log lines should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Headless commands: stderr, leaving stdout for output.
    Stderr,
    /// Terminal UI: a file, since the UI owns the screen.
    File,
}

fn filter(config: &Config) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level)
            .with_context(|| format!("Invalid log_level '{}'", config.log_level)),
    }
}

pub fn init(config: &Config, target: LogTarget) -> Result<()> {
    let filter = filter(config)?;

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
        LogTarget::File => {
            fs::create_dir_all(&config.asked_home)
                .context("Failed to create .asked directory")?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(config.log_path())
                .context("Failed to open log file")?;

            tracing_subscriber::fmt()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_env_filter(filter)
                .init();
        }
    }

    Ok(())
}
