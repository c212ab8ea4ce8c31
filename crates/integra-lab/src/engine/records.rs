//! Typed artifacts produced by scenario steps.
//!
//! These replace free-form maps: each step builds one of these records and
//! either stores it in [`ScenarioState`](super::state::ScenarioState) or
//! returns it in its [`StepResult`](super::steps::StepResult).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::log::TraceId;
use super::state::CircuitState;

/// Input accepted by a scenario run. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioInput {
    pub customer_id: String,
    pub product: String,
    pub client_id: String,
    pub risk_data: RiskData,
}

impl Default for ScenarioInput {
    fn default() -> Self {
        Self {
            customer_id: "C001".to_string(),
            product: "AUTO".to_string(),
            client_id: "web-portal".to_string(),
            risk_data: RiskData::default(),
        }
    }
}

/// Risk attributes sent with a quote request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskData {
    pub vehicle_type: String,
    pub driver_age: u32,
}

impl Default for RiskData {
    fn default() -> Self {
        Self {
            vehicle_type: "sedan".to_string(),
            driver_age: 35,
        }
    }
}

/// Gateway authentication outcome (step 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResult {
    pub authenticated: bool,
    pub client_id: String,
    pub rate_limit_remaining: u32,
}

/// Rating factors returned by the external rating API (step 2).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingFactors {
    pub base_rate: f64,
    pub risk_factor: f64,
    pub discounts: f64,
}

impl RatingFactors {
    /// Fixed factors used by the sandbox.
    pub const SANDBOX: RatingFactors = RatingFactors {
        base_rate: 500.0,
        risk_factor: 1.2,
        discounts: 0.9,
    };

    /// Premium rounded to cents.
    pub fn premium(&self) -> f64 {
        round_cents(self.base_rate * self.risk_factor * self.discounts)
    }
}

/// Round a monetary amount to two decimals.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: String,
    pub customer_id: String,
    pub product: String,
    pub premium: f64,
    pub validity: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub number: String,
    pub quote_id: String,
    pub customer_id: String,
    pub product: String,
    pub premium: f64,
    pub status: String,
    pub start_date: DateTime<Utc>,
    pub coverages: Vec<String>,
}

/// One step of the subscription saga (step 3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SagaStep {
    pub name: String,
    pub status: String,
}

impl SagaStep {
    pub fn new(name: &str, status: &str) -> Self {
        Self {
            name: name.to_string(),
            status: status.to_string(),
        }
    }
}

/// Event placed on `topic.policies` (step 4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub trace_id: Option<TraceId>,
    pub payload: PolicyCreatedPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyCreatedPayload {
    pub policy_number: String,
    pub customer_id: String,
    pub product: String,
    pub premium: f64,
    pub coverages: Vec<String>,
}

/// Record of a subscriber handling an event (steps 5 and 6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumedEvent {
    pub consumer: String,
    pub event_type: String,
    pub action: String,
    pub result: ConsumerOutcome,
}

/// What a consumer produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConsumerOutcome {
    Invoice(Invoice),
    Notification(Notification),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub policy_number: String,
    pub amount: f64,
    pub due_date: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub channel: String,
    pub template: String,
    pub recipient: String,
    pub subject: String,
    pub status: String,
}

/// Row change captured by CDC (step 7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdcChange {
    pub table: String,
    pub operation: String,
    pub timestamp: DateTime<Utc>,
    pub before: Option<Policy>,
    pub after: Option<Policy>,
}

/// Warehouse row after the ETL transform (step 7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DwhRecord {
    pub policy_id: String,
    pub customer_id: String,
    pub product_line: String,
    pub gross_premium: f64,
    pub net_premium: f64,
    pub coverage_count: usize,
    pub created_at: DateTime<Utc>,
    pub loaded_at: DateTime<Utc>,
}

/// Dashboard refresh (step 8).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportingUpdate {
    pub dashboard: String,
    pub metrics_updated: Vec<MetricDelta>,
    pub last_refresh: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub name: String,
    pub delta: f64,
}

impl MetricDelta {
    pub fn new(name: &str, delta: f64) -> Self {
        Self {
            name: name.to_string(),
            delta,
        }
    }
}

/// A scripted call failure against the billing service (step 9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub attempt: u32,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

/// Degraded behavior while the circuit is open (step 9).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fallback {
    pub action: String,
    pub message: String,
    pub retry_at: String,
}

/// Probe request sent while the circuit is half-open (step 10).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub status: String,
    pub latency_ms: u64,
}

/// Replay of queued messages after recovery (step 10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryResult {
    pub queued_messages: u32,
    pub processed: u32,
    pub failed: u32,
}

/// Circuit history reported by the recovery step.
pub type CircuitTransitions = Vec<CircuitState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_premium() {
        assert_eq!(RatingFactors::SANDBOX.premium(), 540.0);
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(540.0 * 0.85), 459.0);
        assert_eq!(round_cents(10.005_1), 10.01);
    }

    #[test]
    fn test_input_defaults_fill_missing_fields() {
        let input: ScenarioInput = serde_json::from_str(r#"{"customer_id": "C042"}"#).unwrap();
        assert_eq!(input.customer_id, "C042");
        assert_eq!(input.product, "AUTO");
        assert_eq!(input.client_id, "web-portal");
        assert_eq!(input.risk_data.driver_age, 35);
    }

    #[test]
    fn test_notification_wire_names() {
        let n = Notification {
            channel: "EMAIL".into(),
            template: "WELCOME_POLICY".into(),
            recipient: "a@b".into(),
            subject: "s".into(),
            status: "SENT".into(),
        };
        let value = serde_json::to_value(ConsumerOutcome::Notification(n)).unwrap();
        assert_eq!(value["type"], "EMAIL");
        assert!(value.get("channel").is_none());
    }
}
