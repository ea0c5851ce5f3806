//! Builder collecting property checks.

use crate::expect::failure::{AssertionFailure, Mismatch};
use std::fmt::Debug;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<Mismatch>>;

/// A batch of checks verified together.
#[derive(Default)]
pub struct Expectations {
    checks: Vec<Check>,
}

impl Expectations {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Require `actual == expected`.
    pub fn equal<A, E>(mut self, message: &str, actual: A, expected: E) -> Self
    where
        A: PartialEq<E> + Debug,
        E: Debug,
    {
        let check = if actual == expected {
            Validation::success(())
        } else {
            Validation::fail(Mismatch {
                message: message.to_string(),
                expected: format!("{expected:?}"),
                actual: format!("{actual:?}"),
            })
        };
        self.checks.push(check);
        self
    }

    /// Require `actual` to be true.
    pub fn is_true(self, message: &str, actual: bool) -> Self {
        self.equal(message, actual, true)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check, reporting ALL mismatches.
    pub fn verify(self) -> Result<(), AssertionFailure> {
        match Validation::all_vec(self.checks) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => {
                Err(AssertionFailure::new(errors.iter().cloned().collect()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passing_checks_verify() {
        let result = Expectations::new()
            .equal("title is not correct", "JBang", "JBang")
            .is_true("extension is not installed", true)
            .verify();
        assert!(result.is_ok());
    }

    #[test]
    fn empty_expectations_verify() {
        assert!(Expectations::new().is_empty());
        assert!(Expectations::new().verify().is_ok());
    }

    #[test]
    fn all_mismatches_are_accumulated() {
        let failure = Expectations::new()
            .equal("title is not correct", "Other", "JBang")
            .equal("description is incorrect", "same", "same")
            .equal("author is incorrect", "Acme", "Red Hat")
            .is_true("extension is not installed", false)
            .verify()
            .unwrap_err();

        assert_eq!(failure.mismatches().len(), 3);
        assert!(failure.mentions("title is not correct"));
        assert!(failure.mentions("author is incorrect"));
        assert!(failure.mentions("extension is not installed"));
        assert!(!failure.mentions("description is incorrect"));
    }

    #[test]
    fn failure_message_names_expected_and_actual() {
        let failure = Expectations::new()
            .equal("author is incorrect", "Acme", "Red Hat")
            .verify()
            .unwrap_err();

        let message = failure.to_string();
        assert!(message.contains("author is incorrect"));
        assert!(message.contains("\"Red Hat\""));
        assert!(message.contains("\"Acme\""));
    }

    #[test]
    fn owned_and_borrowed_strings_compare() {
        let actual = String::from("JBang");
        let result = Expectations::new()
            .equal("title is not correct", actual.as_str(), "JBang")
            .verify();
        assert!(result.is_ok());
    }
}
