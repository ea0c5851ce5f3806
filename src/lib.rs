//! Vigil: polling-driven state machines for verifying editor extensions.
//!
//! A scenario is a sequence of named states. Each state inspects the live UI
//! once and returns a single directive: advance, retry, or jump to another
//! state. Per-state timers keep a state from repeating a UI trigger while the
//! UI catches up, and typed dependency slots carry discovered UI handles
//! between states. When a held handle goes stale, the state that probed it
//! routes back to the state that rediscovers it instead of failing.
//!
//! # Core Concepts
//!
//! - **Scenario**: the types a graph is built from (`Scenario`)
//! - **State functions**: `StateFn` implementations returning a `Directive`
//! - **Engine**: `StateMachine` applies directives and enforces the deadline
//! - **UI traits**: what a driver implements (`ui`)
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use vigil::builder::MachineBuilder;
//! use vigil::config::MachineConfig;
//! use vigil::effects::{Directive, Provide, Scenario, StateError, StateFn};
//! use vigil::state_enum;
//!
//! state_enum! {
//!     enum Phase {
//!         Ready,
//!     }
//! }
//!
//! struct Smoke;
//!
//! impl Scenario for Smoke {
//!     type State = Phase;
//!     type Context = ();
//!     type Deps = ();
//!     type Env = ();
//! }
//!
//! struct Ready;
//!
//! #[async_trait]
//! impl StateFn<Smoke> for Ready {
//!     async fn run(
//!         &self,
//!         provide: Provide<'_, Smoke>,
//!         _deps: &(),
//!         _env: &(),
//!     ) -> Result<Directive<Smoke>, StateError> {
//!         Ok(provide.next())
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let mut machine = MachineBuilder::<Smoke>::new(MachineConfig::new("smoke"))
//!     .context(())
//!     .dependencies(())
//!     .state(Phase::Ready, Ready)
//!     .build()
//!     .unwrap();
//!
//! let summary = machine.start(&()).await.unwrap();
//! assert_eq!(summary.invocations, 1);
//! # });
//! ```

pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod core;
pub mod effects;
pub mod expect;
pub mod logging;
pub mod scenarios;
pub mod ui;

pub use builder::{BuildError, MachineBuilder};
pub use checkpoint::{Checkpoint, CheckpointError, MachineMetadata};
pub use config::{ConfigError, MachineConfig};
pub use crate::core::{
    Clock, Context, Dependencies, DependencyError, HandleSlot, ManualClock, Probe, State,
    SystemClock, TimerRegistry, ValueSlot,
};
pub use effects::{
    Directive, Provide, RunError, RunSummary, Scenario, StateError, StateFn, StateMachine,
    StepResult,
};
pub use expect::{AssertionFailure, Expectations};
pub use scenarios::{ExtensionMetadata, TRIGGER_WINDOW};
