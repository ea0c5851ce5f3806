//! Scenario-wide record shared by every state function.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A scenario record updated through shallow merges.
///
/// `Patch` names the fields an update may touch; fields the patch leaves
/// unset keep their current value.
pub trait Context:
    Clone + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    type Patch: Debug + Send + Sync + 'static;

    fn merge(&mut self, patch: Self::Patch);
}

impl Context for () {
    type Patch = ();

    fn merge(&mut self, _patch: ()) {}
}

/// Holder for the current context record.
#[derive(Clone, Debug)]
pub struct ContextStore<C: Context> {
    record: C,
}

impl<C: Context> ContextStore<C> {
    pub fn new(initial: C) -> Self {
        Self { record: initial }
    }

    pub fn read(&self) -> &C {
        &self.record
    }

    pub fn update(&mut self, patch: C::Patch) {
        self.record.merge(patch);
    }

    /// Swap in a whole record, as when resuming from a checkpoint.
    pub fn replace(&mut self, record: C) {
        self.record = record;
    }
}
