//! Per-state timers bounding how long a state keeps polling.
//!
//! A state that triggers an action (opening a panel, say) installs a timer
//! under its own identifier and then polls passively. Once the timer elapses
//! it may trigger again. Timers never abort a scenario on their own.

use super::clock::elapsed_between;
use super::state::State;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;

/// A single timer installed by a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer {
    pub duration: Duration,
    pub created_at: DateTime<Utc>,
}

impl Timer {
    /// True iff `now - created_at >= duration`.
    pub fn has_elapsed(&self, now: DateTime<Utc>) -> bool {
        elapsed_between(self.created_at, now) >= self.duration
    }
}

/// At most one timer per state identifier.
#[derive(Clone, Debug)]
pub struct TimerRegistry<S: State> {
    timers: HashMap<S, Timer>,
}

impl<S: State> Default for TimerRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> TimerRegistry<S> {
    pub fn new() -> Self {
        Self {
            timers: HashMap::new(),
        }
    }

    pub fn has_timer(&self, state: &S) -> bool {
        self.timers.contains_key(state)
    }

    /// False when no timer is registered for `state`.
    pub fn has_elapsed(&self, state: &S, now: DateTime<Utc>) -> bool {
        self.timers
            .get(state)
            .is_some_and(|timer| timer.has_elapsed(now))
    }

    /// Install a timer, replacing any existing one for `state`.
    pub fn create(&mut self, state: S, duration: Duration, now: DateTime<Utc>) {
        self.timers.insert(
            state,
            Timer {
                duration,
                created_at: now,
            },
        );
    }

    pub fn clear(&mut self, state: &S) {
        self.timers.remove(state);
    }

    pub fn clear_all(&mut self) {
        self.timers.clear();
    }

    pub fn get(&self, state: &S) -> Option<&Timer> {
        self.timers.get(state)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
