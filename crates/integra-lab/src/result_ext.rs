//! Logging helpers for `Result` and `Option`.
//!
//! Used where an error is deliberately absorbed (degraded documentation
//! loading) so the failure still lands in the log with its call site.

use std::fmt::Display;
use tracing::{error, warn};

/// Extension trait for logging errors with context.
pub trait ResultExt<T, E> {
    /// Log the error with context if this is an `Err` variant.
    ///
    /// Returns the original `Result` unchanged.
    ///
    /// ```ignore
    /// use integra_lab::result_ext::ResultExt;
    ///
    /// let parsed: Result<u32, _> = "x".parse::<u32>().log("parsing module id");
    /// ```
    fn log<S: ToString>(self, context: S) -> Result<T, E>;

    /// Like [`ResultExt::log`] but at `warn` level, for failures the caller recovers from.
    fn log_warn<S: ToString>(self, context: S) -> Result<T, E>;
}

impl<T, E: Display> ResultExt<T, E> for Result<T, E> {
    #[track_caller]
    fn log<S: ToString>(self, context: S) -> Result<T, E> {
        if let Err(ref e) = self {
            let caller_location = std::panic::Location::caller();
            error!(
                target: "integra_lab",
                error = %e,
                file = %format!("{}:{}", caller_location.file(), caller_location.line()),
                context = %context.to_string(),
                "Operation failed"
            );
        }
        self
    }

    #[track_caller]
    fn log_warn<S: ToString>(self, context: S) -> Result<T, E> {
        if let Err(ref e) = self {
            let caller_location = std::panic::Location::caller();
            warn!(
                target: "integra_lab",
                error = %e,
                file = %format!("{}:{}", caller_location.file(), caller_location.line()),
                context = %context.to_string(),
                "Operation failed, continuing"
            );
        }
        self
    }
}

/// Extension trait for logging a missing value.
pub trait OptionResultExt<T> {
    /// Log if this is a `None` variant.
    fn log_none<S: ToString>(self, context: S) -> Option<T>;
}

impl<T> OptionResultExt<T> for Option<T> {
    #[track_caller]
    fn log_none<S: ToString>(self, context: S) -> Option<T> {
        if self.is_none() {
            let caller_location = std::panic::Location::caller();
            warn!(
                target: "integra_lab",
                file = %format!("{}:{}", caller_location.file(), caller_location.line()),
                context = %context.to_string(),
                "Expected value was None"
            );
        }
        self
    }
}
