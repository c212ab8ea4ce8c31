//! Teaching pillars shared by the scenario engine and the documentation corpus.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three integration pillars, plus the cross-cutting category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    /// APIs, gateways, composition.
    Applications,
    /// Pub/sub, queues, event sourcing.
    Events,
    /// ETL, CDC, data quality.
    Data,
    /// Resilience, observability, security.
    CrossCutting,
}

impl Pillar {
    /// All pillars in display order.
    pub const ALL: [Pillar; 4] = [
        Pillar::Applications,
        Pillar::Events,
        Pillar::Data,
        Pillar::CrossCutting,
    ];

    /// Wire name, as used in the JSON documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applications => "applications",
            Self::Events => "events",
            Self::Data => "data",
            Self::CrossCutting => "cross_cutting",
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pillar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pillar::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown pillar '{}', expected one of: applications, events, data, cross_cutting",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_names() {
        for pillar in Pillar::ALL {
            assert_eq!(pillar.as_str().parse::<Pillar>().unwrap(), pillar);
        }
        assert!("Applications".parse::<Pillar>().is_err());
    }

    #[test]
    fn test_serde_matches_wire_name() {
        let json = serde_json::to_string(&Pillar::CrossCutting).unwrap();
        assert_eq!(json, "\"cross_cutting\"");
    }
}
