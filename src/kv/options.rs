//! Store options and their TOML form.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Options applied when opening a [`Store`](crate::Store).
///
/// Can be built in code or loaded from TOML:
///
/// ```toml
/// lock_timeout_ms = 200
/// lock_poll_ms = 5
/// file_mode = 0o600
/// cache_size = 16777216
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// How long to wait for the file lock, in milliseconds. Zero waits
    /// indefinitely.
    pub lock_timeout_ms: u64,

    /// Delay between lock attempts, in milliseconds.
    pub lock_poll_ms: u64,

    /// Permission bits for a newly created backing file (Unix only).
    pub file_mode: u32,

    /// Page cache size in bytes. Uses the engine default if not set.
    pub cache_size: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            lock_timeout_ms: 50,
            lock_poll_ms: 10,
            file_mode: 0o640,
            cache_size: None,
        }
    }
}

impl Options {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lock acquisition timeout. `Duration::ZERO` waits forever.
    #[must_use]
    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout_ms = millis(timeout);
        self
    }

    /// Set the delay between lock attempts.
    #[must_use]
    pub fn lock_poll_interval(mut self, interval: Duration) -> Self {
        self.lock_poll_ms = millis(interval);
        self
    }

    /// Set the permission bits used when the file is created.
    #[must_use]
    pub const fn file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }

    /// Set the page cache size.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }

    /// The lock budget, or `None` when waiting indefinitely.
    pub fn lock_budget(&self) -> Option<Duration> {
        (self.lock_timeout_ms > 0).then(|| Duration::from_millis(self.lock_timeout_ms))
    }

    /// Delay between lock attempts, never below one millisecond.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.lock_poll_ms.max(1))
    }

    /// Load options from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        Self::from_toml_str(&content)
    }

    /// Parse options from a TOML string. Missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Error loading [`Options`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading the options file.
    #[error("failed to read options file '{0}': {1}")]
    Io(String, #[source] std::io::Error),

    /// TOML parse error.
    #[error("failed to parse options: {0}")]
    Parse(#[source] toml::de::Error),
}
