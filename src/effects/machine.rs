//! The engine that drives registered states to completion.

use crate::builder::BuildError;
use crate::checkpoint::{Checkpoint, CheckpointError, MachineMetadata};
use crate::config::MachineConfig;
use crate::core::{
    elapsed_between, Clock, ContextStore, Dependencies, State, StateHistory, StateTransition,
    TimerRegistry,
};
use crate::effects::error::RunError;
use crate::effects::state_fn::{Scenario, StateFn};
use crate::effects::transition::{Control, Provide, TimerOp};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of executing a single step
#[derive(Clone, Debug, PartialEq)]
pub enum StepResult<S: State> {
    /// Control moved to another state
    Transitioned(S),

    /// The same state will be invoked again
    Retry { attempts: usize },

    /// `Next` was issued by the last registered state
    Completed,
}

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub scenario: String,
    pub invocations: usize,
    pub elapsed: Duration,
}

/// Executes one scenario's states, one invocation at a time.
///
/// Taking `&mut self` for every invocation is what guarantees that no state
/// ever observes a mutation from anything but the previous invocation.
pub struct StateMachine<Sc: Scenario> {
    config: MachineConfig,
    states: Vec<(Sc::State, Arc<dyn StateFn<Sc>>)>,
    index: HashMap<Sc::State, usize>,
    context: ContextStore<Sc::Context>,
    deps: Sc::Deps,
    timers: TimerRegistry<Sc::State>,
    clock: Arc<dyn Clock>,
    history: StateHistory<Sc::State>,
    metadata: MachineMetadata,
    current: usize,
    attempts: usize,
    finished: bool,
    stopped: bool,
}

impl<Sc: Scenario> StateMachine<Sc> {
    /// Create an empty machine. States are added with [`StateMachine::register`].
    pub fn new(
        config: MachineConfig,
        context: Sc::Context,
        deps: Sc::Deps,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let metadata = MachineMetadata::new(clock.now());
        Self {
            config,
            states: Vec::new(),
            index: HashMap::new(),
            context: ContextStore::new(context),
            deps,
            timers: TimerRegistry::new(),
            clock,
            history: StateHistory::new(),
            metadata,
            current: 0,
            attempts: 0,
            finished: false,
            stopped: false,
        }
    }

    /// Append a state in registration order.
    pub fn register<F>(&mut self, id: Sc::State, state: F) -> Result<(), BuildError>
    where
        F: StateFn<Sc> + 'static,
    {
        if self.index.contains_key(&id) {
            return Err(BuildError::DuplicateState {
                name: id.name().into_owned(),
            });
        }
        self.index.insert(id.clone(), self.states.len());
        self.states.push((id, Arc::new(state)));
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Identifier of the state the next step will invoke.
    pub fn current_state(&self) -> Option<&Sc::State> {
        self.states.get(self.current).map(|(id, _)| id)
    }

    pub fn context(&self) -> &Sc::Context {
        self.context.read()
    }

    pub fn dependencies(&self) -> &Sc::Deps {
        &self.deps
    }

    pub fn timers(&self) -> &TimerRegistry<Sc::State> {
        &self.timers
    }

    pub fn history(&self) -> &StateHistory<Sc::State> {
        &self.history
    }

    pub fn metadata(&self) -> &MachineMetadata {
        &self.metadata
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Invoke the current state once and apply its directive.
    pub async fn step(&mut self, env: &Sc::Env) -> Result<StepResult<Sc::State>, RunError> {
        if self.stopped {
            return Err(RunError::Stopped {
                scenario: self.config.name.clone(),
            });
        }
        if self.finished {
            return Ok(StepResult::Completed);
        }
        let Some((id, handler)) = self
            .states
            .get(self.current)
            .map(|(id, handler)| (id.clone(), Arc::clone(handler)))
        else {
            self.finished = true;
            return Ok(StepResult::Completed);
        };

        let now = self.clock.now();
        self.metadata.record_invocation(&id.name(), now);
        debug!(
            scenario = %self.config.name,
            state = %id.name(),
            attempt = self.attempts,
            "invoking state"
        );

        let provide = Provide::new(&id, self.context.read(), &self.timers, now);
        let directive = match handler.run(provide, &self.deps, env).await {
            Ok(directive) => directive,
            Err(source) => {
                warn!(scenario = %self.config.name, state = %id.name(), error = %source, "state failed");
                return Err(RunError::StateFailed {
                    state: id.name().into_owned(),
                    source,
                });
            }
        };

        let parts = directive.into_parts();

        // Resolve the target before touching anything so a bad jump leaves
        // dependencies, context and timers as they were.
        let target = match &parts.control {
            Control::TryAgain => None,
            Control::Next => Some(self.current + 1),
            Control::Transition(target) => match self.index.get(target) {
                Some(position) => Some(*position),
                None => {
                    return Err(RunError::UnknownState {
                        from: id.name().into_owned(),
                        target: target.name().into_owned(),
                    })
                }
            },
        };

        for fill in parts.fills {
            fill(&mut self.deps);
        }
        for patch in parts.patches {
            self.context.update(patch);
        }
        let applied_at = self.clock.now();
        for op in parts.timers {
            match op {
                TimerOp::Create { state, duration } => self.timers.create(state, duration, applied_at),
                TimerOp::Clear(state) => self.timers.clear(&state),
            }
        }

        let Some(position) = target else {
            self.attempts += 1;
            return Ok(StepResult::Retry {
                attempts: self.attempts,
            });
        };

        let Some((next_id, _)) = self.states.get(position) else {
            debug!(scenario = %self.config.name, state = %id.name(), "last state advanced");
            self.finished = true;
            return Ok(StepResult::Completed);
        };
        let next_id = next_id.clone();

        debug!(
            scenario = %self.config.name,
            from = %id.name(),
            to = %next_id.name(),
            attempts = self.attempts,
            "transition"
        );
        self.history = self.history.record(StateTransition {
            from: id,
            to: next_id.clone(),
            timestamp: applied_at,
            attempt: self.attempts,
        });
        self.current = position;
        self.attempts = 0;
        Ok(StepResult::Transitioned(next_id))
    }

    /// Drive the scenario until its last state advances or the deadline passes.
    pub async fn start(&mut self, env: &Sc::Env) -> Result<RunSummary, RunError> {
        if self.stopped {
            return Err(RunError::Stopped {
                scenario: self.config.name.clone(),
            });
        }
        let started_at = self.clock.now();
        let invocations_before = self.metadata.invocations;
        info!(scenario = %self.config.name, states = self.states.len(), "starting scenario");

        loop {
            let elapsed = elapsed_between(started_at, self.clock.now());
            let Some(remaining) = self.config.timeout.checked_sub(elapsed).filter(|r| !r.is_zero())
            else {
                return Err(self.timed_out());
            };

            let from = self.current;
            let outcome = match tokio::time::timeout(remaining, self.step(env)).await {
                Ok(outcome) => outcome?,
                Err(_) => return Err(self.timed_out()),
            };

            match outcome {
                StepResult::Completed => {
                    let summary = RunSummary {
                        scenario: self.config.name.clone(),
                        invocations: self.metadata.invocations - invocations_before,
                        elapsed: elapsed_between(started_at, self.clock.now()),
                    };
                    info!(
                        scenario = %summary.scenario,
                        invocations = summary.invocations,
                        "scenario completed"
                    );
                    return Ok(summary);
                }
                StepResult::Retry { .. } => self.pause().await,
                // A jump back to the same or an earlier state is a retry of
                // a longer cycle and is paced like one.
                StepResult::Transitioned(_) if self.current <= from => self.pause().await,
                StepResult::Transitioned(_) => {}
            }
        }
    }

    async fn pause(&self) {
        if !self.config.poll_interval.is_zero() {
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// Release every held handle and timer. The machine cannot be started again.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.deps.release();
        self.timers.clear_all();
        self.stopped = true;
        info!(scenario = %self.config.name, "scenario stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn checkpoint(&self) -> Option<Checkpoint<Sc::State, Sc::Context>> {
        let current = self.current_state()?.clone();
        Some(Checkpoint::new(
            self.config.name.clone(),
            current,
            self.context.read().clone(),
            self.history.clone(),
            self.metadata.clone(),
            self.clock.now(),
        ))
    }

    /// Resume from a checkpoint at the entry state.
    ///
    /// Context, history and counters are taken from the checkpoint. Held
    /// handles and timers are dropped since they do not survive a restart.
    pub fn restore(
        &mut self,
        checkpoint: Checkpoint<Sc::State, Sc::Context>,
    ) -> Result<(), CheckpointError> {
        checkpoint.check_version()?;
        if checkpoint.scenario != self.config.name {
            return Err(CheckpointError::ScenarioMismatch {
                expected: self.config.name.clone(),
                found: checkpoint.scenario,
            });
        }

        info!(
            scenario = %self.config.name,
            checkpoint = %checkpoint.id,
            paused_in = %checkpoint.current_state.name(),
            "restoring scenario"
        );
        self.context.replace(checkpoint.context);
        self.history = checkpoint.history;
        self.metadata = checkpoint.metadata;
        self.deps.release();
        self.timers.clear_all();
        self.current = 0;
        self.attempts = 0;
        self.finished = false;
        Ok(())
    }

    fn timed_out(&self) -> RunError {
        let state = self
            .current_state()
            .map(|s| s.name().into_owned())
            .unwrap_or_default();
        warn!(
            scenario = %self.config.name,
            state = %state,
            timeout = ?self.config.timeout,
            "scenario deadline exceeded"
        );
        RunError::Timeout {
            scenario: self.config.name.clone(),
            state,
            timeout: self.config.timeout,
        }
    }
}
