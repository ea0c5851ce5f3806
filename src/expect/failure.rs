//! Assertion mismatches and the failure they add up to.

use thiserror::Error;

/// One expected property that did not hold.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}: expected {expected}, found {actual}")]
pub struct Mismatch {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

/// Every mismatch found by one round of checks.
///
/// Raised by assertion states; the engine never retries past it.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("assertion failed: {}", summarize(.mismatches))]
pub struct AssertionFailure {
    mismatches: Vec<Mismatch>,
}

impl AssertionFailure {
    pub fn new(mismatches: Vec<Mismatch>) -> Self {
        Self { mismatches }
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// True if any mismatch carries exactly `message`.
    pub fn mentions(&self, message: &str) -> bool {
        self.mismatches.iter().any(|m| m.message == message)
    }
}

fn summarize(mismatches: &[Mismatch]) -> String {
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
