//! Scenario simulation engine.
//!
//! Runs scripted, strictly sequential scenarios for the sandbox:
//!
//! - **Scenario**: step functions that mutate a run's own [`ScenarioState`]
//! - **Log**: ordered run log stamped with a [`TraceId`]
//! - **Summary**: derived view of the final state
//! - **Catalog**: scenario descriptors and dispatch by id

pub mod catalog;
pub mod error;
pub mod log;
pub mod records;
pub mod scenario;
pub mod state;
pub mod steps;
pub mod summary;

pub use catalog::{ScenarioDescriptor, ScenarioKind};
pub use error::{ScenarioError, ScenarioResult};
pub use log::{LogEntry, LogLevel, RunLog, TraceId};
pub use records::ScenarioInput;
pub use scenario::{Cross04Scenario, ScenarioReport, STEP_COUNT};
pub use state::{CircuitState, ScenarioState, Underwriting};
pub use steps::{StepPayload, StepResult};
pub use summary::ScenarioSummary;
