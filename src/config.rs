use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that overrides the configured backend URL
pub const BACKEND_URL_ENV: &str = "ASKED_BACKEND_URL";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of `~/.asked/config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    /// Base URL of the chat backend
    pub backend_url: Option<String>,

    /// Tracing filter directive, e.g. `info` or `asked=debug`
    pub log_level: Option<String>,
}

impl FileConfig {
    /// Read a config file, treating a missing file as empty
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

/// Resolved application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend_url: String,
    pub log_level: String,
    /// `~/.asked`, home of the config file and the UI log
    pub asked_home: PathBuf,
}

impl Config {
    /// Load configuration: CLI flag, then environment, then config file, then defaults.
    ///
    /// `cli_url` is the value of `--backend-url`.
    pub fn load(cli_url: Option<String>) -> Result<Self> {
        let asked_home = Self::default_home()?;
        let file = FileConfig::load_from(&asked_home.join("config.toml"))?;
        let env_url = std::env::var(BACKEND_URL_ENV).ok();
        Ok(Self::resolve(cli_url, env_url, file, asked_home))
    }

    /// Merge the sources; the first non-blank backend URL wins
    pub fn resolve(
        cli_url: Option<String>,
        env_url: Option<String>,
        file: FileConfig,
        asked_home: PathBuf,
    ) -> Self {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let backend_url = non_blank(cli_url)
            .or_else(|| non_blank(env_url))
            .or_else(|| non_blank(file.backend_url))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let log_level = non_blank(file.log_level).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        debug!(%backend_url, %log_level, "configuration resolved");

        Config {
            backend_url: backend_url.trim().to_string(),
            log_level,
            asked_home,
        }
    }

    /// Path of the log file written while the terminal UI is running
    pub fn log_path(&self) -> PathBuf {
        self.asked_home.join("asked.log")
    }

    fn default_home() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".asked"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = FileConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(file, FileConfig::default());

        let config = Config::resolve(None, None, file, dir.path().to_path_buf());
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_path(), dir.path().join("asked.log"));
    }

    #[test]
    fn file_values_are_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "backend_url = \"https://asked.example.edu\"\nlog_level = \"asked=debug\"\n",
        )
        .unwrap();

        let file = FileConfig::load_from(&path).unwrap();
        let config = Config::resolve(None, None, file, dir.path().to_path_buf());

        assert_eq!(config.backend_url, "https://asked.example.edu");
        assert_eq!(config.log_level, "asked=debug");
    }

    #[test]
    fn cli_value_beats_env_and_file() {
        let file = FileConfig {
            backend_url: Some("https://from-file".to_string()),
            log_level: None,
        };
        let config = Config::resolve(
            Some("http://from-cli:9000".to_string()),
            Some("http://from-env:8080".to_string()),
            file,
            PathBuf::from("/tmp/asked"),
        );
        assert_eq!(config.backend_url, "http://from-cli:9000");
    }

    #[test]
    fn env_value_beats_file() {
        let file = FileConfig {
            backend_url: Some("https://from-file".to_string()),
            log_level: None,
        };
        let config = Config::resolve(
            None,
            Some("http://from-env:8080".to_string()),
            file,
            PathBuf::from("/tmp/asked"),
        );
        assert_eq!(config.backend_url, "http://from-env:8080");
    }

    #[test]
    fn blank_values_fall_through() {
        let file = FileConfig {
            backend_url: Some("   ".to_string()),
            log_level: Some(String::new()),
        };
        let config = Config::resolve(
            Some(String::new()),
            Some("  ".to_string()),
            file,
            PathBuf::from("/tmp/asked"),
        );
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "backend_url = [unterminated").unwrap();

        let err = FileConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
