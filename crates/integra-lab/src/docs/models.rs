//! Documentation records and API response shapes.
//!
//! Pattern and glossary records keep the JSON object they were read from
//! and serialize back to it, so detail endpoints return the document's
//! record unchanged. The typed fields are read leniently: a missing, `null`
//! or non-string value becomes empty, and one odd record never fails the
//! whole file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// An integration pattern from `patterns.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Pattern {
    pub id: String,
    pub name: String,
    pub pillar: Option<String>,
    pub category: Option<String>,
    pub problem: String,
    pub solution: String,
    /// The record as stored.
    pub record: Map<String, Value>,
}

impl Pattern {
    /// Case-folded text the search matches against.
    pub fn searchable_text(&self) -> String {
        format!("{} {} {}", self.name, self.problem, self.solution).to_lowercase()
    }
}

impl From<Map<String, Value>> for Pattern {
    fn from(record: Map<String, Value>) -> Self {
        Self {
            id: text(&record, "id"),
            name: text(&record, "name"),
            pillar: optional_text(&record, "pillar"),
            category: optional_text(&record, "category"),
            problem: text(&record, "problem"),
            solution: text(&record, "solution"),
            record,
        }
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

/// A glossary term from `glossary.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct GlossaryTerm {
    pub id: String,
    pub term: String,
    pub pillar: Option<String>,
    pub definition: String,
    pub aliases: Vec<String>,
    /// The record as stored.
    pub record: Map<String, Value>,
}

impl GlossaryTerm {
    /// Case-folded text the search matches against.
    pub fn searchable_text(&self) -> String {
        format!(
            "{} {} {}",
            self.term,
            self.definition,
            self.aliases.join(" ")
        )
        .to_lowercase()
    }
}

impl From<Map<String, Value>> for GlossaryTerm {
    fn from(record: Map<String, Value>) -> Self {
        let aliases = record
            .get("aliases")
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: text(&record, "id"),
            term: text(&record, "term"),
            pillar: optional_text(&record, "pillar"),
            definition: text(&record, "definition"),
            aliases,
            record,
        }
    }
}

impl Serialize for GlossaryTerm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

fn optional_text(record: &Map<String, Value>, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_string)
}

fn text(record: &Map<String, Value>, key: &str) -> String {
    optional_text(record, key).unwrap_or_default()
}

/// Top-level shape of `patterns.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternsDocument {
    #[serde(default)]
    pub patterns: Vec<Pattern>,
}

/// Top-level shape of `glossary.json`, also returned by `GET /glossary`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlossaryDocument {
    #[serde(default)]
    pub terms: Vec<GlossaryTerm>,
    /// Pillar id to display metadata (name, icon, color, ...).
    #[serde(default)]
    pub pillars: Map<String, Value>,
}

/// Which collection a search hit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitKind {
    Pattern,
    Glossary,
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "type")]
    pub kind: HitKind,
    pub id: String,
    pub name: String,
    pub pillar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub excerpt: String,
}

/// Aggregate counts over both collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsStats {
    pub total_patterns: usize,
    pub total_terms: usize,
    pub patterns_by_pillar: BTreeMap<String, usize>,
    pub terms_by_pillar: BTreeMap<String, usize>,
    pub categories: Vec<String>,
}

/// Documentation linked to a theory module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedDocs {
    pub module_id: u32,
    pub patterns: Vec<Pattern>,
    pub terms: Vec<GlossaryTerm>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pattern_keeps_unknown_fields() {
        let raw = json!({
            "id": "saga",
            "name": "Saga",
            "pillar": "events",
            "problem": "p",
            "solution": "s",
            "insurance_example": "Policy subscription"
        });
        let pattern: Pattern = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(pattern.record["insurance_example"], "Policy subscription");
        assert!(pattern.category.is_none());
        assert_eq!(serde_json::to_value(&pattern).unwrap(), raw);
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let document: PatternsDocument = serde_json::from_value(json!({
            "patterns": [
                {"id": "api-gateway", "name": "API Gateway", "problem": "p", "solution": "s"},
                {"id": "x", "name": null, "problem": null, "solution": 7, "category": null}
            ]
        }))
        .unwrap();
        assert_eq!(document.patterns.len(), 2);

        let odd = &document.patterns[1];
        assert_eq!(odd.name, "");
        assert_eq!(odd.problem, "");
        assert_eq!(odd.solution, "");
        assert!(odd.category.is_none());
        assert!(odd.searchable_text().trim().is_empty());
    }

    #[test]
    fn test_term_serializes_as_stored() {
        let raw = json!({
            "id": "a",
            "term": "A",
            "definition": "d",
            "pillar": null,
            "aliases": []
        });
        let term: GlossaryTerm = serde_json::from_value(raw.clone()).unwrap();
        assert!(term.aliases.is_empty());
        assert!(term.pillar.is_none());
        assert_eq!(serde_json::to_value(&term).unwrap(), raw);
    }

    #[test]
    fn test_term_searchable_text_includes_aliases() {
        let term: GlossaryTerm = serde_json::from_value(json!({
            "id": "dlq",
            "term": "Dead Letter Queue",
            "definition": "Holds poison messages",
            "aliases": ["DLQ", null]
        }))
        .unwrap();
        assert_eq!(term.aliases, ["DLQ"]);
        assert!(term.searchable_text().contains("dlq"));
    }
}
