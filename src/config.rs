//! Client configuration.
//!
//! Values come from an optional TOML file, then the environment
//! (`GO_FIVE_BASE_URL`, `GO_FIVE_ROOM`), then command-line flags.

use crate::room::RoomId;
use crate::sync::DEFAULT_POLL_INTERVAL;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable naming the room store base URL.
pub const BASE_URL_VAR: &str = "GO_FIVE_BASE_URL";

/// Environment variable naming the room, as a number or `?room=N` query.
pub const ROOM_VAR: &str = "GO_FIVE_ROOM";

/// Configuration for a playing client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Room store base URL. Without one the game stays on this machine.
    #[serde(default)]
    base_url: Option<String>,

    /// Room to join.
    #[serde(default)]
    room: RoomId,

    /// Milliseconds between polls of the room document.
    #[serde(default = "default_poll_interval_ms")]
    poll_interval_ms: u64,
}

#[instrument]
fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            room: RoomId::DEFAULT,
            poll_interval_ms: default_poll_interval_ms(),
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

        if config.poll_interval_ms == 0 {
            return Err(ConfigError::new("poll_interval_ms must be positive".to_string()));
        }

        info!(room = %config.room, "Config loaded successfully");
        Ok(config)
    }

    /// Applies `GO_FIVE_BASE_URL` and `GO_FIVE_ROOM` from the environment.
    #[instrument(skip(self))]
    pub fn with_env(self) -> Self {
        self.with_overrides(
            std::env::var(BASE_URL_VAR).ok(),
            std::env::var(ROOM_VAR).ok().as_deref(),
        )
    }

    /// Overrides base URL and room.
    ///
    /// `room` may be a bare number or a query string; an invalid value
    /// selects the default room.
    pub fn with_overrides(mut self, base_url: Option<String>, room: Option<&str>) -> Self {
        if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.base_url = Some(base_url);
        }
        if let Some(room) = room {
            self.room = if room.contains('=') {
                RoomId::from_query(room)
            } else {
                room.parse().unwrap_or(RoomId::DEFAULT)
            };
        }
        self
    }

    /// Overrides the poll interval.
    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms.max(1);
        self
    }

    /// Poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), &None);
        assert_eq!(config.room(), &RoomId::DEFAULT);
        assert_eq!(config.poll_interval(), Duration::from_millis(2000));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://127.0.0.1:3000\"\nroom = 42").unwrap();
        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base_url().as_deref(), Some("http://127.0.0.1:3000"));
        assert_eq!(config.room().get(), 42);
        assert_eq!(*config.poll_interval_ms(), 2000);
    }

    #[test]
    fn test_from_file_rejects_bad_room() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "room = 100000000").unwrap();
        assert!(ClientConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::default()
            .with_overrides(Some("http://example.test".to_string()), Some("?room=17"));
        assert_eq!(config.room().get(), 17);
        assert_eq!(config.base_url().as_deref(), Some("http://example.test"));

        let config = config.with_overrides(None, Some("not-a-room"));
        assert_eq!(config.room(), &RoomId::DEFAULT);
        assert_eq!(config.base_url().as_deref(), Some("http://example.test"));
    }
}
