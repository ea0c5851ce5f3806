//! Building blocks shared by the engine and the scenarios.
//!
//! - State identifiers via the `State` trait
//! - Dependency slots carrying UI handles and static values between states
//! - Per-state timers and the clocks they read
//! - The scenario context record and its store
//! - Immutable history of state transitions

mod clock;
mod context;
mod dependency;
mod history;
mod state;
mod timer;

pub use clock::{elapsed_between, Clock, ManualClock, SystemClock};
pub use context::{Context, ContextStore};
pub use dependency::{Dependencies, DependencyError, HandleSlot, Probe, SlotKind, ValueSlot};
pub use history::{StateHistory, StateTransition};
pub use state::State;
pub use timer::{Timer, TimerRegistry};
