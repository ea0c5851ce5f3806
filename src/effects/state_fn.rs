//! The contract between the engine and the states it drives.

use crate::core::{Context, Dependencies, State};
use crate::effects::error::StateError;
use crate::effects::transition::{Directive, Provide};
use async_trait::async_trait;

/// Ties together the types one scenario is built from.
///
/// Implemented by marker types; a scenario value is never constructed.
pub trait Scenario: Send + Sync + 'static {
    type State: State;
    type Context: Context;
    type Deps: Dependencies;
    /// Root UI capability the states create fresh handles from.
    type Env: Send + Sync + 'static;
}

/// A single decision step.
///
/// The engine may invoke a state any number of times while it polls, so a
/// state must not assume it runs once. It inspects the dependencies, the
/// context and its timers, performs at most one round of probes against the
/// UI, and returns exactly one [`Directive`].
///
/// Parameterized families (one instance per expected item) are plain structs
/// carrying the item, registered once per item under distinct identifiers.
#[async_trait]
pub trait StateFn<Sc: Scenario>: Send + Sync {
    async fn run(
        &self,
        provide: Provide<'_, Sc>,
        deps: &Sc::Deps,
        env: &Sc::Env,
    ) -> Result<Directive<Sc>, StateError>;
}
