//! Builder for constructing scenario machines.

use crate::builder::error::BuildError;
use crate::config::MachineConfig;
use crate::core::{Clock, SystemClock};
use crate::effects::{Scenario, StateFn, StateMachine};
use std::sync::Arc;

type Registration<Sc> = Box<dyn FnOnce(&mut StateMachine<Sc>) -> Result<(), BuildError> + Send>;

/// Builder for constructing state machines with a fluent API.
///
/// States run in the order they are added; the first one is the entry state.
pub struct MachineBuilder<Sc: Scenario> {
    config: MachineConfig,
    context: Option<Sc::Context>,
    deps: Option<Sc::Deps>,
    clock: Arc<dyn Clock>,
    states: Vec<Registration<Sc>>,
}

impl<Sc: Scenario> MachineBuilder<Sc> {
    pub fn new(config: MachineConfig) -> Self {
        Self {
            config,
            context: None,
            deps: None,
            clock: Arc::new(SystemClock),
            states: Vec::new(),
        }
    }

    /// Set the initial context record (required).
    pub fn context(mut self, context: Sc::Context) -> Self {
        self.context = Some(context);
        self
    }

    /// Set the declared dependency slots (required).
    pub fn dependencies(mut self, deps: Sc::Deps) -> Self {
        self.deps = Some(deps);
        self
    }

    /// Replace the wall clock, e.g. with a `ManualClock` in tests.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Register a state under `id`.
    pub fn state<F>(mut self, id: Sc::State, state: F) -> Self
    where
        F: StateFn<Sc> + 'static,
    {
        self.states
            .push(Box::new(move |machine: &mut StateMachine<Sc>| {
                machine.register(id, state)
            }));
        self
    }

    /// Register one state per item, as for a parameterized family.
    pub fn states<I, F>(mut self, family: I) -> Self
    where
        I: IntoIterator<Item = (Sc::State, F)>,
        F: StateFn<Sc> + 'static,
    {
        for (id, state) in family {
            self = self.state(id, state);
        }
        self
    }

    pub fn build(self) -> Result<StateMachine<Sc>, BuildError> {
        let context = self.context.ok_or(BuildError::MissingContext)?;
        let deps = self.deps.ok_or(BuildError::MissingDependencies)?;

        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let mut machine = StateMachine::new(self.config, context, deps, self.clock);
        for register in self.states {
            register(&mut machine)?;
        }
        Ok(machine)
    }
}
