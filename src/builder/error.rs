//! Build errors for scenario machines.

use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Context not specified. Call .context(record) before .build()")]
    MissingContext,

    #[error("Dependencies not specified. Call .dependencies(slots) before .build()")]
    MissingDependencies,

    #[error("No states registered. Add at least one state")]
    NoStates,

    #[error("State '{name}' is registered twice")]
    DuplicateState { name: String },
}
