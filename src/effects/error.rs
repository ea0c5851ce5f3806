//! Errors raised by state functions and by the engine running them.

use crate::core::DependencyError;
use crate::expect::AssertionFailure;
use crate::ui::UiError;
use std::time::Duration;
use thiserror::Error;

/// Fatal failures a state function can report.
///
/// Recoverable conditions (element not shown yet, the probed slot vanished)
/// never reach this type; a state turns them into a retry or a transition.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Ui(#[from] UiError),

    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error(transparent)]
    Assertion(#[from] AssertionFailure),

    #[error("resume index {index} is out of range for a chain of {len} checks")]
    ResumeOutOfRange { index: usize, len: usize },
}

/// Errors that abort a running scenario.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("state '{state}' failed: {source}")]
    StateFailed {
        state: String,
        #[source]
        source: StateError,
    },

    #[error("scenario '{scenario}' timed out after {timeout:?} while in state '{state}'")]
    Timeout {
        scenario: String,
        state: String,
        timeout: Duration,
    },

    #[error("state '{from}' transitioned to unregistered state '{target}'")]
    UnknownState { from: String, target: String },

    #[error("scenario '{scenario}' has been stopped")]
    Stopped { scenario: String },
}

impl RunError {
    /// The assertion failure behind this error, if that is what aborted the run.
    pub fn assertion(&self) -> Option<&AssertionFailure> {
        match self {
            RunError::StateFailed {
                source: StateError::Assertion(failure),
                ..
            } => Some(failure),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RunError::Timeout { .. })
    }
}
