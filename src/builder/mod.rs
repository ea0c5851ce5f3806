//! Builder API for assembling scenario machines.
//!
//! This module provides a fluent builder and the `state_enum!` macro for
//! declaring state identifiers with minimal boilerplate.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::MachineBuilder;
