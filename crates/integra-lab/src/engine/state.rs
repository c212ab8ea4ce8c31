//! Mutable state of a single scenario run.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::records::{ConsumedEvent, FailureRecord, Policy, PublishedEvent, Quote};

/// Circuit breaker position as narrated by the resilience steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CircuitState {
    #[default]
    Closed,
    Open,
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "CLOSED"),
            Self::Open => write!(f, "OPEN"),
            Self::HalfOpen => write!(f, "HALF_OPEN"),
        }
    }
}

/// Quote and policy lifecycle. A policy only exists alongside its quote.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Underwriting {
    #[default]
    Pending,
    Quoted(Quote),
    Issued { quote: Quote, policy: Policy },
}

impl Underwriting {
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            Self::Pending => None,
            Self::Quoted(quote) | Self::Issued { quote, .. } => Some(quote),
        }
    }

    pub fn policy(&self) -> Option<&Policy> {
        match self {
            Self::Issued { policy, .. } => Some(policy),
            _ => None,
        }
    }

    /// Record a new quote. An issued policy is kept.
    pub fn set_quote(&mut self, quote: Quote) {
        *self = match std::mem::take(self) {
            Self::Issued { policy, .. } => Self::Issued { quote, policy },
            Self::Pending | Self::Quoted(_) => Self::Quoted(quote),
        };
    }

    /// Build a policy from the current quote and attach it. `None` if there is no quote.
    pub fn issue(&mut self, build: impl FnOnce(&Quote) -> Policy) -> Option<&Policy> {
        let quote = match std::mem::take(self) {
            Self::Pending => return None,
            Self::Quoted(quote) | Self::Issued { quote, .. } => quote,
        };
        let policy = build(&quote);
        *self = Self::Issued { quote, policy };
        self.policy()
    }
}

impl Serialize for Underwriting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Underwriting", 2)?;
        s.serialize_field("quote", &self.quote())?;
        s.serialize_field("policy", &self.policy())?;
        s.end()
    }
}

/// Everything a run accumulates. Fields only grow; nothing is rewound.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScenarioState {
    pub current_step: u32,
    #[serde(flatten)]
    pub underwriting: Underwriting,
    pub events_published: Vec<PublishedEvent>,
    pub events_consumed: Vec<ConsumedEvent>,
    pub dwh_synced: bool,
    pub circuit_breaker_state: CircuitState,
    pub failures: Vec<FailureRecord>,
    pub recovery_performed: bool,
}

impl ScenarioState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quote(&self) -> Option<&Quote> {
        self.underwriting.quote()
    }

    pub fn policy(&self) -> Option<&Policy> {
        self.underwriting.policy()
    }

    /// Mark `step` as executed. `current_step` never moves backwards.
    pub fn complete_step(&mut self, step: u32) {
        self.current_step = self.current_step.max(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(id: &str) -> Quote {
        Quote {
            id: id.to_string(),
            customer_id: "C001".into(),
            product: "AUTO".into(),
            premium: 540.0,
            validity: "30 days".into(),
            status: "VALID".into(),
        }
    }

    #[test]
    fn test_issue_requires_quote() {
        let mut uw = Underwriting::default();
        assert!(uw.issue(|_| Policy::default()).is_none());
        assert_eq!(uw, Underwriting::Pending);

        uw.set_quote(quote("Q-1"));
        let issued = uw
            .issue(|q| Policy {
                quote_id: q.id.clone(),
                ..Policy::default()
            })
            .unwrap();
        assert_eq!(issued.quote_id, "Q-1");
        assert_eq!(uw.quote().unwrap().id, "Q-1");
    }

    #[test]
    fn test_requote_keeps_policy() {
        let mut uw = Underwriting::Quoted(quote("Q-1"));
        uw.issue(|_| Policy::default()).unwrap();
        uw.set_quote(quote("Q-2"));
        assert_eq!(uw.quote().unwrap().id, "Q-2");
        assert!(uw.policy().is_some());
    }

    #[test]
    fn test_complete_step_is_monotonic() {
        let mut state = ScenarioState::new();
        state.complete_step(4);
        state.complete_step(2);
        assert_eq!(state.current_step, 4);
    }

    #[test]
    fn test_state_serializes_quote_and_policy() {
        let mut state = ScenarioState::new();
        state.underwriting.set_quote(quote("Q-9"));
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["quote"]["id"], "Q-9");
        assert!(value["policy"].is_null());
        assert_eq!(value["circuit_breaker_state"], "CLOSED");
    }
}
