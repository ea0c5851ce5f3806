//! Typed dependency slots carried between states.
//!
//! A [`HandleSlot`] holds a UI handle discovered by one state for use by
//! later ones, and remembers the handle's identity token so a staleness
//! signal can be attributed to it. A [`ValueSlot`] holds static
//! configuration and is only ever filled at declaration.

use crate::ui::{HandleId, UiError, UiHandle};
use thiserror::Error;

/// Errors raised when reading a dependency.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DependencyError {
    #[error("dependency '{name}' has not been resolved")]
    Unresolved { name: &'static str },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    Value,
    Handle,
}

/// Outcome of a probe on a slot's handle.
#[derive(Clone, Debug, PartialEq)]
pub enum Probe<T> {
    Ready(T),
    /// The handle held by this very slot no longer resolves.
    Vanished,
}

/// The full set of slots a scenario declares.
pub trait Dependencies: Send + Sync + 'static {
    /// Drop every held handle. Called when a scenario stops.
    fn release(&mut self);
}

impl Dependencies for () {
    fn release(&mut self) {}
}

/// Refillable slot for a UI handle.
#[derive(Debug)]
pub struct HandleSlot<T> {
    name: &'static str,
    value: Option<T>,
    token: Option<HandleId>,
}

impl<T: UiHandle> HandleSlot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            value: None,
            token: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> SlotKind {
        SlotKind::Handle
    }

    pub fn fill(&mut self, value: T) {
        self.token = Some(value.handle_id());
        self.value = Some(value);
    }

    pub fn read(&self) -> Result<&T, DependencyError> {
        self.value
            .as_ref()
            .ok_or(DependencyError::Unresolved { name: self.name })
    }

    pub fn token(&self) -> Option<HandleId> {
        self.token
    }

    pub fn is_filled(&self) -> bool {
        self.value.is_some()
    }

    pub fn release(&mut self) {
        self.value = None;
        self.token = None;
    }

    /// Attribute a probe result to this slot.
    ///
    /// A staleness signal for this slot's own handle becomes
    /// [`Probe::Vanished`]; every other error is handed back untouched.
    pub fn classify<R>(&self, result: Result<R, UiError>) -> Result<Probe<R>, UiError> {
        match result {
            Ok(value) => Ok(Probe::Ready(value)),
            Err(UiError::Stale { handle }) if self.token == Some(handle) => Ok(Probe::Vanished),
            Err(other) => Err(other),
        }
    }

    /// True iff the UI layer reports the held handle as stale.
    pub async fn is_stale(&self) -> Result<bool, crate::effects::StateError> {
        let handle = self.read()?;
        match self.classify(handle.is_displayed().await)? {
            Probe::Vanished => Ok(true),
            Probe::Ready(_) => Ok(false),
        }
    }
}

/// Slot for a static value, filled once at declaration.
#[derive(Clone, Debug)]
pub struct ValueSlot<T> {
    name: &'static str,
    value: T,
}

impl<T: Send + Sync + 'static> ValueSlot<T> {
    pub fn new(name: &'static str, value: T) -> Self {
        Self { name, value }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> SlotKind {
        SlotKind::Value
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}
