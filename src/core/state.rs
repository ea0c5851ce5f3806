//! Stable identifiers for the states of a scenario.
//!
//! Every registered state function is keyed by a value implementing [`State`].
//! Timers, transition targets and history entries all refer to states through
//! this identifier, never through the state function itself.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state identifiers.
///
/// # Required Traits
///
/// - `Clone` + `Eq` + `Hash`: identifiers key the timer registry and the
///   engine's state index
/// - `Debug`: identifiers appear in diagnostics
/// - `Serialize` + `Deserialize`: identifiers are persisted in checkpoints
///
/// # Example
///
/// ```rust
/// use vigil::core::State;
/// use serde::{Deserialize, Serialize};
/// use std::borrow::Cow;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Step {
///     Open,
///     Check(usize),
///     Close,
/// }
///
/// impl State for Step {
///     fn name(&self) -> Cow<'_, str> {
///         match self {
///             Self::Open => Cow::Borrowed("Open"),
///             Self::Check(i) => Cow::Owned(format!("Check({i})")),
///             Self::Close => Cow::Borrowed("Close"),
///         }
///     }
/// }
///
/// assert_eq!(Step::Check(2).name(), "Check(2)");
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> Cow<'_, str>;
}
