//! Run configuration for a scenario.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Overall deadline for one scenario run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(150_000);

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Errors raised while loading configuration or extension metadata.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("extension manifest has no author")]
    MissingAuthor,
}

/// How one scenario runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Scenario name, used in logs, errors and checkpoints
    pub name: String,

    /// Deadline for the whole run
    #[serde(rename = "timeout_ms", with = "millis")]
    pub timeout: Duration,

    /// Pause between `TryAgain` invocations
    #[serde(rename = "poll_interval_ms", with = "millis", default = "default_poll")]
    pub poll_interval: Duration,
}

impl MachineConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::new("scenario")
    }
}

fn default_poll() -> Duration {
    DEFAULT_POLL_INTERVAL
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
