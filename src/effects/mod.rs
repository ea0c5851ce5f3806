//! The polling engine and the contract its states follow.
//!
//! # Key Concepts
//!
//! - **State functions**: `StateFn` implementations, one per registered state
//! - **Directives**: exactly one control action plus the dependency, context
//!   and timer mutations to apply with it
//! - **State Machine**: invokes one state at a time, applies directives and
//!   enforces the scenario deadline
//!
//! Everything a state may mutate travels in its directive, so a state
//! function itself only reads.

mod error;
mod machine;
mod state_fn;
mod transition;

pub use error::{RunError, StateError};
pub use machine::{RunSummary, StateMachine, StepResult};
pub use state_fn::{Scenario, StateFn};
pub use transition::{Control, Directive, Provide, TimerOp};
