//! Opt-in log output for scenario runs.
//!
//! The engine always emits `tracing` events. Nothing is printed unless
//! [`STDOUT_LOGGING_ENV`] is set, in which case [`init`] installs a `fmt`
//! subscriber writing to stdout, filtered by `RUST_LOG` (default `info`).

use tracing_subscriber::EnvFilter;

pub const STDOUT_LOGGING_ENV: &str = "VIGIL_STDOUT_LOGGING";

/// Install the stdout subscriber if logging was requested.
///
/// Returns whether a subscriber was installed. Calling it again, or after
/// another global subscriber was set, is a no-op.
pub fn init() -> bool {
    if !stdout_logging_requested(std::env::var(STDOUT_LOGGING_ENV).ok().as_deref()) {
        return false;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .try_init()
        .is_ok()
}

fn stdout_logging_requested(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(v) => !matches!(v.trim(), "" | "0" | "false"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_or_falsy_means_silent() {
        assert!(!stdout_logging_requested(None));
        assert!(!stdout_logging_requested(Some("")));
        assert!(!stdout_logging_requested(Some("0")));
        assert!(!stdout_logging_requested(Some("false")));
    }

    #[test]
    fn any_other_value_enables_stdout() {
        assert!(stdout_logging_requested(Some("1")));
        assert!(stdout_logging_requested(Some("true")));
    }
}
