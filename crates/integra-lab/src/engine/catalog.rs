//! Sandbox scenario catalog.
//!
//! Maps scenario ids to their step descriptors (what the sandbox UI shows
//! before a run) and to the runner that executes them.

use std::time::Duration;

use serde::Serialize;

use crate::pillar::Pillar;

use super::error::ScenarioResult;
use super::records::ScenarioInput;
use super::scenario::{Cross04Scenario, ScenarioReport};
use super::summary::{SCENARIO_ID, SCENARIO_TITLE};

/// Scenarios available in the sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    Cross04,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 1] = [ScenarioKind::Cross04];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Cross04 => SCENARIO_ID,
        }
    }

    /// Look up a scenario by id, case-insensitively.
    pub fn find(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(id))
    }

    pub fn descriptor(&self) -> ScenarioDescriptor {
        match self {
            Self::Cross04 => cross_04_descriptor(),
        }
    }

    /// Execute a fresh run of this scenario.
    pub async fn run(
        &self,
        input: &ScenarioInput,
        step_delay: Duration,
    ) -> ScenarioResult<ScenarioReport> {
        match self {
            Self::Cross04 => {
                Cross04Scenario::new()
                    .with_step_delay(step_delay)
                    .run(input)
                    .await
            }
        }
    }
}

/// Static description of a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub pillars: Vec<Pillar>,
    pub steps: Vec<StepDescriptor>,
}

/// One step as presented to the learner.
#[derive(Debug, Clone, Serialize)]
pub struct StepDescriptor {
    pub number: u32,
    pub title: &'static str,
    pub pillar: Pillar,
    pub instruction: &'static str,
}

impl StepDescriptor {
    fn new(number: u32, title: &'static str, pillar: Pillar, instruction: &'static str) -> Self {
        Self {
            number,
            title,
            pillar,
            instruction,
        }
    }
}

/// Short listing entry.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioListing {
    pub id: &'static str,
    pub title: &'static str,
    pub step_count: usize,
}

impl From<&ScenarioDescriptor> for ScenarioListing {
    fn from(d: &ScenarioDescriptor) -> Self {
        Self {
            id: d.id,
            title: d.title,
            step_count: d.steps.len(),
        }
    }
}

/// Listings for every scenario.
pub fn list() -> Vec<ScenarioListing> {
    ScenarioKind::ALL
        .iter()
        .map(|kind| ScenarioListing::from(&kind.descriptor()))
        .collect()
}

fn cross_04_descriptor() -> ScenarioDescriptor {
    let step = StepDescriptor::new;

    ScenarioDescriptor {
        id: SCENARIO_ID,
        title: SCENARIO_TITLE,
        description: "End-to-end insurance subscription combining Applications, Events and Data, \
                      with a billing outage absorbed by a circuit breaker.",
        pillars: Pillar::ALL.to_vec(),
        steps: vec![
            step(
                1,
                "API Gateway receives the quote request",
                Pillar::Applications,
                "Send a quote request through the API Gateway. Watch JWT authentication, \
                 rate limiting and the trace id assigned to the whole flow.",
            ),
            step(
                2,
                "Quote Engine calculates the premium",
                Pillar::Applications,
                "The gateway routes to the Quote Engine, which calls the external rating API \
                 and applies base rate, risk factor and discounts.",
            ),
            step(
                3,
                "Policy Admin creates the policy (Saga)",
                Pillar::Applications,
                "Convert the quote into a policy. Follow the saga steps: reserve quote, \
                 verify customer, create policy, initialize billing.",
            ),
            step(
                4,
                "Publish the PolicyCreated event",
                Pillar::Events,
                "Publish PolicyCreated on topic.policies. Four subscribers receive it: \
                 billing, notifications, documents and audit.",
            ),
            step(
                5,
                "Billing consumes the event",
                Pillar::Events,
                "The billing consumer reacts to PolicyCreated and generates the first invoice.",
            ),
            step(
                6,
                "Notifications sends the welcome email",
                Pillar::Events,
                "The notifications consumer sends a welcome email to the customer, \
                 independently of billing.",
            ),
            step(
                7,
                "CDC syncs the policy to the Data Warehouse",
                Pillar::Data,
                "Change data capture picks up the INSERT on the policies table and loads an \
                 enriched record (net premium, coverage count) into the DWH.",
            ),
            step(
                8,
                "Reporting dashboard refresh",
                Pillar::Data,
                "The daily sales dashboard updates its metrics from the warehouse data.",
            ),
            step(
                9,
                "Billing outage trips the circuit breaker",
                Pillar::CrossCutting,
                "Billing stops answering. After three failed calls the circuit opens and the \
                 fallback queues payments for retry.",
            ),
            step(
                10,
                "Recovery and retry of queued messages",
                Pillar::CrossCutting,
                "Billing comes back. A half-open probe succeeds, the circuit closes and the \
                 queued messages are processed.",
            ),
        ],
    }
}
