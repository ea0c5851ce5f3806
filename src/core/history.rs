//! Record of control transfers between states.
//!
//! Polling states re-enter themselves many times; only the moves from one
//! state to another are recorded here, each tagged with the number of retries
//! the source state spent before it let go.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single move from one state to another.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state control left
    pub from: S,
    /// The state control moved to
    pub to: S,
    /// When the directive was applied
    pub timestamp: DateTime<Utc>,
    /// How many `TryAgain` rounds `from` spent before this move
    pub attempt: usize,
}

/// Ordered history of state transitions.
///
/// History is immutable: [`StateHistory::record`] returns a new history with
/// the transition appended.
///
/// # Example
///
/// ```rust
/// use vigil::core::{StateHistory, StateTransition};
/// use vigil::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Phase { Open, Check, Close }
/// }
///
/// let history = StateHistory::new()
///     .record(StateTransition { from: Phase::Open, to: Phase::Check, timestamp: Utc::now(), attempt: 2 })
///     .record(StateTransition { from: Phase::Check, to: Phase::Close, timestamp: Utc::now(), attempt: 0 });
///
/// assert_eq!(history.get_path(), vec![&Phase::Open, &Phase::Check, &Phase::Close]);
/// assert_eq!(history.visits(&Phase::Check), 1);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// States traversed in order: the first source, then every target.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Number of times control moved into `state`.
    pub fn visits(&self, state: &S) -> usize {
        self.transitions.iter().filter(|t| &t.to == state).count()
    }

    /// Time between the first and the last recorded transition.
    ///
    /// Returns `None` if nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.last()
    }

    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }
}
