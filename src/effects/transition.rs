//! Directives returned by state functions and the view they are built from.

use crate::core::{Context, HandleSlot, TimerRegistry};
use crate::effects::state_fn::Scenario;
use crate::ui::UiHandle;
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// The single control action carried by a directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Control<S> {
    /// Advance to the next state in registration order.
    Next,
    /// Invoke the same state again.
    TryAgain,
    /// Jump to a registered state.
    Transition(S),
}

/// Timer bookkeeping attached to a directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimerOp<S> {
    Create { state: S, duration: Duration },
    Clear(S),
}

type Fill<D> = Box<dyn FnOnce(&mut D) + Send>;

type Patch<Sc> = <<Sc as Scenario>::Context as Context>::Patch;

/// What a state function hands back to the engine.
///
/// A directive can only be created from a control action, so it always
/// carries exactly one. Dependency fills, context patches and timer
/// operations ride along and are applied together with the control action.
pub struct Directive<Sc: Scenario> {
    control: Control<Sc::State>,
    fills: Vec<Fill<Sc::Deps>>,
    patches: Vec<Patch<Sc>>,
    timers: Vec<TimerOp<Sc::State>>,
}

impl<Sc: Scenario> Directive<Sc> {
    fn with_control(control: Control<Sc::State>) -> Self {
        Self {
            control,
            fills: Vec::new(),
            patches: Vec::new(),
            timers: Vec::new(),
        }
    }

    pub fn next() -> Self {
        Self::with_control(Control::Next)
    }

    pub fn try_again() -> Self {
        Self::with_control(Control::TryAgain)
    }

    pub fn transition(target: Sc::State) -> Self {
        Self::with_control(Control::Transition(target))
    }

    /// Store `value` in the handle slot picked by `slot`.
    pub fn fill<T: UiHandle>(
        mut self,
        slot: fn(&mut Sc::Deps) -> &mut HandleSlot<T>,
        value: T,
    ) -> Self {
        self.fills
            .push(Box::new(move |deps: &mut Sc::Deps| slot(deps).fill(value)));
        self
    }

    pub fn update_context(mut self, patch: Patch<Sc>) -> Self {
        self.patches.push(patch);
        self
    }

    pub fn create_timer(mut self, state: Sc::State, duration: Duration) -> Self {
        self.timers.push(TimerOp::Create { state, duration });
        self
    }

    pub fn clear_timer(mut self, state: Sc::State) -> Self {
        self.timers.push(TimerOp::Clear(state));
        self
    }

    pub fn control(&self) -> &Control<Sc::State> {
        &self.control
    }

    pub fn timer_ops(&self) -> &[TimerOp<Sc::State>] {
        &self.timers
    }

    pub fn patches(&self) -> &[Patch<Sc>] {
        &self.patches
    }

    pub fn fill_count(&self) -> usize {
        self.fills.len()
    }

    pub(crate) fn into_parts(self) -> DirectiveParts<Sc> {
        DirectiveParts {
            control: self.control,
            fills: self.fills,
            patches: self.patches,
            timers: self.timers,
        }
    }
}

impl<Sc: Scenario> fmt::Debug for Directive<Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Directive")
            .field("control", &self.control)
            .field("fills", &self.fills.len())
            .field("patches", &self.patches)
            .field("timers", &self.timers)
            .finish()
    }
}

pub(crate) struct DirectiveParts<Sc: Scenario> {
    pub control: Control<Sc::State>,
    pub fills: Vec<Fill<Sc::Deps>>,
    pub patches: Vec<Patch<Sc>>,
    pub timers: Vec<TimerOp<Sc::State>>,
}

/// Read-only view handed to a state function for one invocation.
///
/// Timer queries are answered against the instant the invocation started,
/// so every check inside one invocation sees the same "now".
pub struct Provide<'a, Sc: Scenario> {
    state: &'a Sc::State,
    context: &'a Sc::Context,
    timers: &'a TimerRegistry<Sc::State>,
    now: DateTime<Utc>,
}

impl<'a, Sc: Scenario> Clone for Provide<'a, Sc> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, Sc: Scenario> Copy for Provide<'a, Sc> {}

impl<'a, Sc: Scenario> Provide<'a, Sc> {
    pub fn new(
        state: &'a Sc::State,
        context: &'a Sc::Context,
        timers: &'a TimerRegistry<Sc::State>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            state,
            context,
            timers,
            now,
        }
    }

    /// Identifier of the state being invoked.
    pub fn state(&self) -> &'a Sc::State {
        self.state
    }

    pub fn context(&self) -> &'a Sc::Context {
        self.context
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn has_timer(&self, state: &Sc::State) -> bool {
        self.timers.has_timer(state)
    }

    pub fn has_elapsed_timer(&self, state: &Sc::State) -> bool {
        self.timers.has_elapsed(state, self.now)
    }

    /// `!has_timer(state) || has_elapsed_timer(state)`: first attempt, or
    /// the grace window is over. Either way, act now.
    pub fn should_trigger(&self, state: &Sc::State) -> bool {
        !self.has_timer(state) || self.has_elapsed_timer(state)
    }

    pub fn next(&self) -> Directive<Sc> {
        Directive::next()
    }

    pub fn try_again(&self) -> Directive<Sc> {
        Directive::try_again()
    }

    pub fn transition(&self, target: Sc::State) -> Directive<Sc> {
        Directive::transition(target)
    }
}
