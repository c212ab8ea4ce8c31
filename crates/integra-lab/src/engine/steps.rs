//! Step results.

use serde::Serialize;

use crate::pillar::Pillar;

use super::log::TraceId;
use super::records::{
    CdcChange, CircuitTransitions, DwhRecord, Fallback, FailureRecord, Invoice, Notification,
    Policy, PublishedEvent, Quote, ReportingUpdate, RetryResult, SagaStep,
};
use super::state::CircuitState;

/// Output of one executed step. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub step: u32,
    pub pillar: Pillar,
    pub action: String,
    pub result: String,
    #[serde(flatten)]
    pub payload: StepPayload,
}

impl StepResult {
    pub fn new(
        step: u32,
        pillar: Pillar,
        action: &str,
        result: impl Into<String>,
        payload: StepPayload,
    ) -> Self {
        Self {
            step,
            pillar,
            action: action.to_string(),
            result: result.into(),
            payload,
        }
    }
}

/// Step-specific part of a [`StepResult`], flattened into the JSON object.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StepPayload {
    Gateway {
        trace_id: TraceId,
    },
    Quote {
        data: Quote,
    },
    PolicyIssued {
        saga_steps: Vec<SagaStep>,
        data: Policy,
    },
    EventPublished {
        event: PublishedEvent,
        subscribers: Vec<String>,
    },
    Invoice {
        data: Invoice,
    },
    Notification {
        data: Notification,
    },
    CdcSync {
        cdc_change: CdcChange,
        dwh_record: DwhRecord,
    },
    Reporting {
        data: ReportingUpdate,
    },
    CircuitOpened {
        failures: Vec<FailureRecord>,
        circuit_state: CircuitState,
        fallback: Fallback,
    },
    Recovery {
        circuit_transitions: CircuitTransitions,
        retry_result: RetryResult,
        final_state: String,
    },
}
