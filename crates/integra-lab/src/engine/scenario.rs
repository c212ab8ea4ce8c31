//! CROSS-04 "Complete Ecosystem" scenario.
//!
//! Narrates an insurance subscription across all pillars:
//!
//! 1. Gateway authentication, then quote calculation and policy saga (Applications)
//! 2. `PolicyCreated` published and consumed by billing and notifications (Events)
//! 3. CDC sync into the warehouse and a reporting refresh (Data)
//! 4. A billing outage handled by a circuit breaker, then recovery (Cross-cutting)
//!
//! The resilience steps are fixed demonstration data. Nothing here detects
//! real faults.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::error::AppResult;
use crate::pillar::Pillar;

use super::error::{ScenarioError, ScenarioResult};
use super::log::{LogEntry, LogLevel, RunLog, TraceId};
use super::records::{
    round_cents, AuthResult, CdcChange, ConsumedEvent, ConsumerOutcome, DwhRecord, FailureRecord,
    Fallback, Invoice, MetricDelta, Notification, Policy, PolicyCreatedPayload, ProbeResult,
    PublishedEvent, Quote, RatingFactors, ReportingUpdate, RetryResult, SagaStep, ScenarioInput,
};
use super::state::{CircuitState, ScenarioState};
use super::steps::{StepPayload, StepResult};
use super::summary::ScenarioSummary;

/// Number of steps in a full run.
pub const STEP_COUNT: u32 = 10;

const POLICY_TOPIC_SUBSCRIBERS: [&str; 4] = ["billing", "notifications", "documents", "audit"];
const EVENT_POLICY_CREATED: &str = "PolicyCreated";
const COMMISSION_RATE: f64 = 0.15;

/// Complete output of a run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub results: Vec<StepResult>,
    pub summary: ScenarioSummary,
    pub logs: Vec<LogEntry>,
}

impl ScenarioReport {
    /// JSON text of the whole report, pretty-printed unless `compact`.
    pub fn render(&self, compact: bool) -> AppResult<String> {
        let rendered = if compact {
            serde_json::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        Ok(rendered)
    }
}

/// One run of the CROSS-04 scenario. Owns its state and log; create a new
/// instance per run.
#[derive(Debug, Default)]
pub struct Cross04Scenario {
    state: ScenarioState,
    trace_id: Option<TraceId>,
    log: RunLog,
    step_delay: Duration,
}

impl Cross04Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause for `delay` inside every step.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    pub fn state(&self) -> &ScenarioState {
        &self.state
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn logs(&self) -> &[LogEntry] {
        self.log.entries()
    }

    fn log(&mut self, level: LogLevel, message: &str, data: serde_json::Value) {
        self.log.record(level, self.trace_id.as_ref(), message, data);
    }

    async fn pace(&self) {
        if !self.step_delay.is_zero() {
            tokio::time::sleep(self.step_delay).await;
        }
    }

    /// Step 1: the gateway authenticates the quote request and opens a trace.
    pub async fn step_1_receive_quote_request(&mut self, input: &ScenarioInput) -> StepResult {
        self.pace().await;
        let trace_id = TraceId::generate();
        self.trace_id = Some(trace_id.clone());

        self.log(
            LogLevel::Info,
            "Gateway received quote request",
            json!({
                "customer_id": input.customer_id,
                "product": input.product,
            }),
        );

        let auth = AuthResult {
            authenticated: true,
            client_id: input.client_id.clone(),
            rate_limit_remaining: 99,
        };
        self.log(LogLevel::Info, "Authentication successful", json!(auth));

        self.state.complete_step(1);
        StepResult::new(
            1,
            Pillar::Applications,
            "Gateway authentication",
            "Request authenticated and routed to Quote Engine",
            StepPayload::Gateway { trace_id },
        )
    }

    /// Step 2: the quote engine prices the risk through the rating API.
    pub async fn step_2_calculate_quote(&mut self, input: &ScenarioInput) -> StepResult {
        self.pace().await;
        let now = Utc::now();
        let quote = Quote {
            id: format!("Q-{}", compact_timestamp(now)),
            customer_id: input.customer_id.clone(),
            product: input.product.clone(),
            premium: RatingFactors::SANDBOX.premium(),
            validity: "30 days".to_string(),
            status: "VALID".to_string(),
        };
        debug!(
            vehicle_type = %input.risk_data.vehicle_type,
            driver_age = input.risk_data.driver_age,
            "Rating with sandbox factors"
        );

        self.log(
            LogLevel::Info,
            "Quote calculated",
            json!({ "quote_id": quote.id, "premium": quote.premium }),
        );

        self.state.underwriting.set_quote(quote.clone());
        self.state.complete_step(2);
        StepResult::new(
            2,
            Pillar::Applications,
            "Quote calculation",
            format!("Quote {} created with premium {:.2}€", quote.id, quote.premium),
            StepPayload::Quote { data: quote },
        )
    }

    /// Step 3: policy admin converts the quote into a policy through a saga.
    pub async fn step_3_create_policy(&mut self) -> ScenarioResult<StepResult> {
        self.pace().await;
        let now = Utc::now();
        let policy = self
            .state
            .underwriting
            .issue(|quote| Policy {
                number: format!("POL-{}", compact_timestamp(now)),
                quote_id: quote.id.clone(),
                customer_id: quote.customer_id.clone(),
                product: quote.product.clone(),
                premium: quote.premium,
                status: "ACTIVE".to_string(),
                start_date: now,
                coverages: ["RC", "VOL", "BRIS_GLACE"].map(String::from).to_vec(),
            })
            .cloned()
            .ok_or(ScenarioError::MissingPrecursor {
                step: 3,
                missing: "quote",
            })?;

        let saga_steps = vec![
            SagaStep::new("ReserveQuote", "COMPLETED"),
            SagaStep::new("VerifyCustomer", "COMPLETED"),
            SagaStep::new("CreatePolicy", "COMPLETED"),
            SagaStep::new("InitializeBilling", "PENDING"),
        ];
        self.log(
            LogLevel::Info,
            "Policy created via saga",
            json!({ "policy_number": policy.number, "saga_steps": saga_steps }),
        );

        self.state.complete_step(3);
        Ok(StepResult::new(
            3,
            Pillar::Applications,
            "Policy creation (Saga)",
            format!("Policy {} created", policy.number),
            StepPayload::PolicyIssued {
                saga_steps,
                data: policy,
            },
        ))
    }

    /// Step 4: `PolicyCreated` is published to `topic.policies`.
    pub async fn step_4_publish_policy_created(&mut self) -> ScenarioResult<StepResult> {
        self.pace().await;
        let policy = self
            .state
            .policy()
            .ok_or(ScenarioError::MissingPrecursor {
                step: 4,
                missing: "policy",
            })?;

        let event = PublishedEvent {
            event_type: EVENT_POLICY_CREATED.to_string(),
            timestamp: Utc::now(),
            trace_id: self.trace_id.clone(),
            payload: PolicyCreatedPayload {
                policy_number: policy.number.clone(),
                customer_id: policy.customer_id.clone(),
                product: policy.product.clone(),
                premium: policy.premium,
                coverages: policy.coverages.clone(),
            },
        };
        let subscribers: Vec<String> = POLICY_TOPIC_SUBSCRIBERS.map(String::from).to_vec();

        self.state.events_published.push(event.clone());
        self.log(
            LogLevel::Info,
            "Event published to topic.policies",
            json!({ "event_type": event.event_type, "subscribers": subscribers }),
        );

        self.state.complete_step(4);
        Ok(StepResult::new(
            4,
            Pillar::Events,
            "Pub/Sub - PolicyCreated",
            format!("Event published to {} subscribers", subscribers.len()),
            StepPayload::EventPublished { event, subscribers },
        ))
    }

    /// Policy as seen by downstream consumers; empty when none was issued.
    fn downstream_policy(&self) -> Policy {
        self.state.policy().cloned().unwrap_or_default()
    }

    /// Step 5: billing consumes the event and raises an invoice.
    pub async fn step_5_billing_consumes(&mut self) -> StepResult {
        self.pace().await;
        let policy = self.downstream_policy();
        let invoice = Invoice {
            id: format!("INV-{}", compact_timestamp(Utc::now())),
            policy_number: policy.number,
            amount: policy.premium,
            due_date: "2024-02-15".to_string(),
            status: "PENDING".to_string(),
        };

        self.state.events_consumed.push(ConsumedEvent {
            consumer: "billing".to_string(),
            event_type: EVENT_POLICY_CREATED.to_string(),
            action: "Generate invoice".to_string(),
            result: ConsumerOutcome::Invoice(invoice.clone()),
        });
        self.log(
            LogLevel::Info,
            "Billing consumed PolicyCreated",
            json!({ "invoice_id": invoice.id, "amount": invoice.amount }),
        );

        self.state.complete_step(5);
        StepResult::new(
            5,
            Pillar::Events,
            "Billing consumer",
            format!("Invoice {} generated for {:.2}€", invoice.id, invoice.amount),
            StepPayload::Invoice { data: invoice },
        )
    }

    /// Step 6: notifications sends the welcome email.
    pub async fn step_6_notifications_consumes(&mut self) -> StepResult {
        self.pace().await;
        let policy = self.downstream_policy();
        let notification = Notification {
            channel: "EMAIL".to_string(),
            template: "WELCOME_POLICY".to_string(),
            recipient: format!("customer_{}@email.com", policy.customer_id),
            subject: format!("Your policy {} is active", policy.number),
            status: "SENT".to_string(),
        };

        self.state.events_consumed.push(ConsumedEvent {
            consumer: "notifications".to_string(),
            event_type: EVENT_POLICY_CREATED.to_string(),
            action: "Send welcome email".to_string(),
            result: ConsumerOutcome::Notification(notification.clone()),
        });
        self.log(
            LogLevel::Info,
            "Notifications consumed PolicyCreated",
            json!({
                "notification_type": notification.channel,
                "recipient": notification.recipient,
            }),
        );

        self.state.complete_step(6);
        StepResult::new(
            6,
            Pillar::Events,
            "Notifications consumer",
            format!("Welcome email sent to {}", notification.recipient),
            StepPayload::Notification { data: notification },
        )
    }

    /// Step 7: CDC captures the policy insert and loads it into the warehouse.
    pub async fn step_7_cdc_sync(&mut self) -> StepResult {
        self.pace().await;
        let issued = self.state.policy().cloned();
        let policy = issued.clone().unwrap_or_default();
        let now = Utc::now();

        let cdc_change = CdcChange {
            table: "policies".to_string(),
            operation: "INSERT".to_string(),
            timestamp: now,
            before: None,
            after: issued,
        };
        let dwh_record = DwhRecord {
            policy_id: policy.number.clone(),
            customer_id: policy.customer_id.clone(),
            product_line: policy.product.clone(),
            gross_premium: policy.premium,
            net_premium: round_cents(policy.premium * (1.0 - COMMISSION_RATE)),
            coverage_count: policy.coverages.len(),
            created_at: policy.start_date,
            loaded_at: now,
        };

        self.state.dwh_synced = true;
        self.log(
            LogLevel::Info,
            "CDC captured and synced to DWH",
            json!({ "operation": cdc_change.operation, "latency_ms": 450 }),
        );

        self.state.complete_step(7);
        StepResult::new(
            7,
            Pillar::Data,
            "CDC → Data Warehouse",
            "Policy synced to DWH with enrichment",
            StepPayload::CdcSync {
                cdc_change,
                dwh_record,
            },
        )
    }

    /// Step 8: the daily sales dashboard picks up the new policy.
    pub async fn step_8_reporting_updated(&mut self) -> StepResult {
        self.pace().await;
        let policy = self.downstream_policy();
        let auto_delta = if policy.product == "AUTO" { 1.0 } else { 0.0 };
        let update = ReportingUpdate {
            dashboard: "daily_sales".to_string(),
            metrics_updated: vec![
                MetricDelta::new("policies_created_today", 1.0),
                MetricDelta::new("premium_volume_today", policy.premium),
                MetricDelta::new("auto_policies_count", auto_delta),
            ],
            last_refresh: Utc::now(),
        };

        self.log(
            LogLevel::Info,
            "Reporting dashboard updated",
            json!({
                "dashboard": update.dashboard,
                "metrics_count": update.metrics_updated.len(),
            }),
        );

        self.state.complete_step(8);
        StepResult::new(
            8,
            Pillar::Data,
            "Reporting refresh",
            "Dashboard updated with new policy metrics",
            StepPayload::Reporting { data: update },
        )
    }

    /// Step 9: billing goes down and the circuit opens. Scripted, not detected.
    pub async fn step_9_simulate_failure(&mut self) -> StepResult {
        self.pace().await;
        let now = Utc::now();
        let failures: Vec<FailureRecord> = [
            "Connection timeout",
            "Connection refused",
            "Connection refused",
        ]
        .into_iter()
        .zip(1..)
        .map(|(error, attempt)| FailureRecord {
            attempt,
            error: error.to_string(),
            timestamp: now,
        })
        .collect();

        self.state.failures.extend(failures.iter().cloned());
        self.state.circuit_breaker_state = CircuitState::Open;

        self.log(
            LogLevel::Warn,
            "Circuit breaker OPENED for billing service",
            json!({
                "failures_count": failures.len(),
                "circuit_state": CircuitState::Open,
                "fallback_activated": true,
            }),
        );

        let fallback = Fallback {
            action: "Queue for retry".to_string(),
            message: "Payment processing queued for later".to_string(),
            retry_at: "2024-01-16T10:00:00Z".to_string(),
        };

        self.state.complete_step(9);
        StepResult::new(
            9,
            Pillar::CrossCutting,
            "Circuit Breaker triggered",
            "Billing service down - circuit OPEN - fallback activated",
            StepPayload::CircuitOpened {
                failures,
                circuit_state: self.state.circuit_breaker_state,
                fallback,
            },
        )
    }

    /// Step 10: a half-open probe succeeds, the circuit closes and the queue drains.
    pub async fn step_10_recovery(&mut self) -> StepResult {
        self.pace().await;
        self.state.circuit_breaker_state = CircuitState::HalfOpen;
        let probe = ProbeResult {
            status: "OK".to_string(),
            latency_ms: 150,
        };
        debug!(status = %probe.status, latency_ms = probe.latency_ms, "Half-open probe");

        self.state.circuit_breaker_state = CircuitState::Closed;
        self.state.recovery_performed = true;

        let retry_result = RetryResult {
            queued_messages: 3,
            processed: 3,
            failed: 0,
        };
        self.log(
            LogLevel::Info,
            "Recovery completed - Circuit CLOSED",
            json!({ "circuit_state": CircuitState::Closed, "retry_result": retry_result }),
        );

        self.state.complete_step(10);
        StepResult::new(
            10,
            Pillar::CrossCutting,
            "Service recovery",
            "Billing service recovered - queued messages processed",
            StepPayload::Recovery {
                circuit_transitions: vec![
                    CircuitState::Open,
                    CircuitState::HalfOpen,
                    CircuitState::Closed,
                ],
                retry_result,
                final_state: "All systems operational".to_string(),
            },
        )
    }

    /// Run steps 1 to 10 in order, stopping at the first error.
    pub async fn execute_all_steps(
        &mut self,
        input: &ScenarioInput,
    ) -> ScenarioResult<Vec<StepResult>> {
        let mut results = Vec::with_capacity(STEP_COUNT as usize);

        results.push(self.step_1_receive_quote_request(input).await);
        results.push(self.step_2_calculate_quote(input).await);
        results.push(self.step_3_create_policy().await?);
        results.push(self.step_4_publish_policy_created().await?);
        results.push(self.step_5_billing_consumes().await);
        results.push(self.step_6_notifications_consumes().await);
        results.push(self.step_7_cdc_sync().await);
        results.push(self.step_8_reporting_updated().await);
        results.push(self.step_9_simulate_failure().await);
        results.push(self.step_10_recovery().await);

        Ok(results)
    }

    /// Summary of the state as it is now.
    pub fn summary(&self) -> ScenarioSummary {
        ScenarioSummary::from_run(&self.state, self.trace_id.clone(), self.log.len())
    }

    /// Execute every step and package the trace.
    pub async fn run(mut self, input: &ScenarioInput) -> ScenarioResult<ScenarioReport> {
        let results = self.execute_all_steps(input).await?;
        let summary = self.summary();
        Ok(ScenarioReport {
            results,
            summary,
            logs: self.log.into_entries(),
        })
    }
}

/// `YYYYMMDDHHMMSS`, used in generated document numbers.
fn compact_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_run_reaches_step_ten() {
        let mut scenario = Cross04Scenario::new();
        let results = scenario
            .execute_all_steps(&ScenarioInput::default())
            .await
            .unwrap();

        assert_eq!(scenario.state().current_step, STEP_COUNT);
        let numbers: Vec<u32> = results.iter().map(|r| r.step).collect();
        assert_eq!(numbers, (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_policy_before_quote_is_refused() {
        let mut scenario = Cross04Scenario::new();
        scenario
            .step_1_receive_quote_request(&ScenarioInput::default())
            .await;
        let logged = scenario.logs().len();

        let err = scenario.step_3_create_policy().await.unwrap_err();
        assert_eq!(
            err,
            ScenarioError::MissingPrecursor {
                step: 3,
                missing: "quote"
            }
        );
        assert!(scenario.state().policy().is_none());
        assert_eq!(scenario.logs().len(), logged);
        assert_eq!(scenario.state().current_step, 1);
    }

    #[tokio::test]
    async fn test_policy_is_attached_when_logged() {
        let mut scenario = Cross04Scenario::new();
        let input = ScenarioInput::default();
        scenario.step_1_receive_quote_request(&input).await;
        scenario.step_2_calculate_quote(&input).await;
        let result = scenario.step_3_create_policy().await.unwrap();

        let policy = scenario.state().policy().unwrap();
        let entry = scenario.logs().last().unwrap();
        assert_eq!(entry.message, "Policy created via saga");
        assert_eq!(entry.data["policy_number"], policy.number.as_str());
        assert_eq!(result.result, format!("Policy {} created", policy.number));
    }

    #[tokio::test]
    async fn test_publish_before_policy_is_refused() {
        let mut scenario = Cross04Scenario::new();
        let input = ScenarioInput::default();
        scenario.step_1_receive_quote_request(&input).await;
        scenario.step_2_calculate_quote(&input).await;

        let err = scenario.step_4_publish_policy_created().await.unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::MissingPrecursor {
                step: 4,
                missing: "policy"
            }
        ));
        assert!(scenario.state().events_published.is_empty());
    }

    #[tokio::test]
    async fn test_trace_id_is_stamped_everywhere() {
        let mut scenario = Cross04Scenario::new();
        scenario
            .execute_all_steps(&ScenarioInput::default())
            .await
            .unwrap();

        let trace = scenario.trace_id().cloned().unwrap();
        assert!(!scenario.logs().is_empty());
        assert!(scenario
            .logs()
            .iter()
            .all(|e| e.trace_id.as_ref() == Some(&trace)));

        let event = &scenario.state().events_published[0];
        assert_eq!(event.trace_id.as_ref(), Some(&trace));
    }

    #[tokio::test]
    async fn test_circuit_opens_then_closes() {
        let mut scenario = Cross04Scenario::new();
        scenario.step_9_simulate_failure().await;
        assert_eq!(scenario.state().circuit_breaker_state, CircuitState::Open);
        assert_eq!(scenario.state().failures.len(), 3);
        assert_eq!(scenario.logs()[0].level, LogLevel::Warn);

        let result = scenario.step_10_recovery().await;
        assert_eq!(scenario.state().circuit_breaker_state, CircuitState::Closed);
        assert!(scenario.state().recovery_performed);
        match result.payload {
            StepPayload::Recovery {
                circuit_transitions,
                retry_result,
                ..
            } => {
                assert_eq!(
                    circuit_transitions,
                    [CircuitState::Open, CircuitState::HalfOpen, CircuitState::Closed]
                );
                assert_eq!(retry_result.failed, 0);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_premium_and_warehouse_figures() {
        let mut scenario = Cross04Scenario::new();
        let results = scenario
            .execute_all_steps(&ScenarioInput::default())
            .await
            .unwrap();

        let quote = scenario.state().quote().unwrap();
        assert_eq!(quote.premium, 540.0);
        assert!(quote.id.starts_with("Q-"));

        let policy = scenario.state().policy().unwrap();
        assert_eq!(policy.quote_id, quote.id);
        assert_eq!(policy.coverages.len(), 3);

        match &results[6].payload {
            StepPayload::CdcSync { dwh_record, .. } => {
                assert_eq!(dwh_record.gross_premium, 540.0);
                assert_eq!(dwh_record.net_premium, 459.0);
                assert_eq!(dwh_record.coverage_count, 3);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
        assert!(scenario.state().dwh_synced);
        assert_eq!(scenario.state().events_consumed.len(), 2);
    }

    #[tokio::test]
    async fn test_non_auto_product_skips_auto_metric() {
        let input = ScenarioInput {
            product: "HOME".to_string(),
            ..ScenarioInput::default()
        };
        let mut scenario = Cross04Scenario::new();
        let results = scenario.execute_all_steps(&input).await.unwrap();

        match &results[7].payload {
            StepPayload::Reporting { data } => {
                let auto = data
                    .metrics_updated
                    .iter()
                    .find(|m| m.name == "auto_policies_count")
                    .unwrap();
                assert_eq!(auto.delta, 0.0);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_consumers_tolerate_missing_policy() {
        let mut scenario = Cross04Scenario::new();
        let result = scenario.step_5_billing_consumes().await;
        assert_eq!(result.step, 5);
        assert_eq!(scenario.state().events_consumed.len(), 1);

        let cdc = scenario.step_7_cdc_sync().await;
        match cdc.payload {
            StepPayload::CdcSync { cdc_change, .. } => assert!(cdc_change.after.is_none()),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_report_shape() {
        let report = Cross04Scenario::new()
            .run(&ScenarioInput::default())
            .await
            .unwrap();
        assert_eq!(report.results.len(), 10);
        assert_eq!(report.summary.logs_count, report.logs.len());

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["results"][3]["event"]["type"], "PolicyCreated");
        assert_eq!(value["results"][3]["subscribers"].as_array().unwrap().len(), 4);
        assert_eq!(value["results"][8]["circuit_state"], "OPEN");

        let compact = report.render(true).unwrap();
        assert!(!compact.contains('\n'));
        let pretty = report.render(false).unwrap();
        assert_eq!(serde_json::from_str::<serde_json::Value>(&pretty).unwrap(), value);
    }
}
