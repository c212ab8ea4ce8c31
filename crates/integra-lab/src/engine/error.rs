//! Scenario engine errors.

use thiserror::Error;

/// Reasons a scenario run aborts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    /// A step ran before the step that produces its input.
    #[error("step {step} requires a {missing}, but none is available")]
    MissingPrecursor {
        /// Step that was refused.
        step: u32,
        /// Artifact it needed (`quote`, `policy`).
        missing: &'static str,
    },
}

/// Result alias for engine operations.
pub type ScenarioResult<T> = Result<T, ScenarioError>;
