//! Checkpoint and resume for scenarios.
//!
//! A checkpoint captures the progress a scenario has accumulated: its context
//! record, transition history and invocation counters. UI handles are not
//! captured; they are meaningless after a restart, so a restored scenario
//! re-enters at its entry state and rediscovers them. States that read
//! context (such as the command chain's resume branch) then pick up where the
//! previous run stopped.

use crate::core::{Context, State, StateHistory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Counters tracked by a running scenario.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MachineMetadata {
    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Total state invocations
    pub invocations: usize,

    /// Invocations per state (state name -> count)
    pub total_attempts: HashMap<String, usize>,
}

impl MachineMetadata {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            invocations: 0,
            total_attempts: HashMap::new(),
        }
    }

    pub(crate) fn record_invocation(&mut self, state: &str, now: DateTime<Utc>) {
        self.invocations += 1;
        *self.total_attempts.entry(state.to_string()).or_insert(0) += 1;
        self.updated_at = now;
    }

    /// How many times the state named `state` has been invoked.
    pub fn attempts(&self, state: &str) -> usize {
        self.total_attempts.get(state).copied().unwrap_or(0)
    }
}

impl Default for MachineMetadata {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// Serializable snapshot of a scenario's progress.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Checkpoint<S: State, C: Context> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    pub timestamp: DateTime<Utc>,

    /// Name of the scenario the checkpoint was taken from
    pub scenario: String,

    /// State the scenario was in when the checkpoint was taken
    pub current_state: S,

    pub context: C,

    pub history: StateHistory<S>,

    pub metadata: MachineMetadata,
}

impl<S: State, C: Context> Checkpoint<S, C> {
    pub fn new(
        scenario: impl Into<String>,
        current_state: S,
        context: C,
        history: StateHistory<S>,
        metadata: MachineMetadata,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp,
            scenario: scenario.into(),
            current_state,
            context,
            history,
            metadata,
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    pub(crate) fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}
