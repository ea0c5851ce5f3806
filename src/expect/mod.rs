//! Accumulating assertions for assertion states.
//!
//! Checks are collected with Stillwater's `Validation`, so a listing with a
//! wrong title *and* a wrong author reports both in one failure instead of
//! stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use vigil::expect::Expectations;
//!
//! let result = Expectations::new()
//!     .equal("title is not correct", "JBang", "JBang")
//!     .equal("author is incorrect", "Acme", "Red Hat")
//!     .is_true("extension is not installed", true)
//!     .verify();
//!
//! let failure = result.unwrap_err();
//! assert!(failure.mentions("author is incorrect"));
//! assert_eq!(failure.mismatches().len(), 1);
//! ```

mod checks;
mod failure;

pub use checks::Expectations;
pub use failure::{AssertionFailure, Mismatch};
