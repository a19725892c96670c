//! Client configuration.

use crate::games::codenames::{BoardSnapshot, Difficulty};
use crate::proxy::DEFAULT_PACING;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "strictly_codenames.toml";

/// Environment variable overriding the server URL.
pub const SERVER_URL_ENV: &str = "CODENAMES_SERVER_URL";

/// Configuration for the game client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", into)]
pub struct ClientConfig {
    /// Base URL of the remote collaborator.
    #[serde(default = "default_server_url")]
    server_url: String,

    /// Delay between replayed opponent reveals, in milliseconds.
    #[serde(default = "default_pacing_ms")]
    pacing_ms: u64,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    /// Starting difficulty. Unset keeps whatever the remote dealt.
    #[serde(default)]
    difficulty: Option<Difficulty>,

    /// Send each settled board to the remote's update endpoint.
    #[serde(default)]
    publish_updates: bool,

    /// Where the terminal UI writes its logs.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

#[instrument]
fn default_server_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

#[instrument]
fn default_pacing_ms() -> u64 {
    u64::try_from(DEFAULT_PACING.as_millis()).unwrap_or(u64::MAX)
}

#[instrument]
fn default_request_timeout_secs() -> u64 {
    30
}

#[instrument]
fn default_log_file() -> PathBuf {
    PathBuf::from("strictly_codenames.log")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            pacing_ms: default_pacing_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            difficulty: None,
            publish_updates: false,
            log_file: default_log_file(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path`, or [`DEFAULT_CONFIG_FILE`] if present, or defaults.
    ///
    /// An explicit path must exist; the default file is optional.
    #[instrument(skip(path))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => {
                info!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    #[instrument(skip(self, lookup))]
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(SERVER_URL_ENV).filter(|url| !url.trim().is_empty()) {
            debug!(server_url = %url, "Server URL overridden by environment");
            self.server_url = url;
        }
        self
    }

    /// Applies the configured difficulty to a freshly dealt board.
    #[instrument(skip(self, board), fields(dealt = %board.difficulty()))]
    pub fn apply_difficulty(&self, board: BoardSnapshot) -> BoardSnapshot {
        match self.difficulty {
            Some(difficulty) => {
                debug!(%difficulty, "Difficulty set by config");
                board.with_difficulty(difficulty)
            }
            None => board,
        }
    }

    /// Replay pacing as a duration.
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
