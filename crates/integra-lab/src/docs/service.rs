//! Documentation queries: search, listing, lookup and statistics.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::pillar::Pillar;

use super::models::{
    DocsStats, GlossaryDocument, GlossaryTerm, HitKind, Pattern, RelatedDocs, SearchHit,
};
use super::related::module_links;
use super::store::DocsStore;

/// Minimum length of a search query, in characters.
pub const MIN_QUERY_LEN: usize = 2;

/// Length of a search excerpt before the ellipsis, in characters.
pub const EXCERPT_LEN: usize = 150;

const UNKNOWN_PILLAR: &str = "other";
const UNKNOWN_CATEGORY: &str = "Other";

/// Service for documentation lookups.
#[derive(Debug, Clone)]
pub struct DocsService {
    store: DocsStore,
}

impl DocsService {
    pub fn new(store: DocsStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DocsStore {
        &self.store
    }

    /// Substring search over patterns then glossary terms.
    pub async fn search(&self, query: &str, pillar: Option<Pillar>) -> AppResult<Vec<SearchHit>> {
        if query.chars().count() < MIN_QUERY_LEN {
            return Err(AppError::Validation(format!(
                "Search query must be at least {} characters",
                MIN_QUERY_LEN
            )));
        }

        let needle = query.to_lowercase();
        let patterns = self.store.load_patterns().await?.patterns;
        let glossary = self.store.load_glossary().await?.terms;

        let pattern_hits = patterns
            .into_iter()
            .filter(|p| matches_pillar(p.pillar.as_deref(), pillar))
            .filter(|p| p.searchable_text().contains(&needle))
            .map(|p| SearchHit {
                kind: HitKind::Pattern,
                excerpt: excerpt(&p.problem),
                id: p.id,
                name: p.name,
                pillar: p.pillar,
                category: p.category,
            });

        let term_hits = glossary
            .into_iter()
            .filter(|t| matches_pillar(t.pillar.as_deref(), pillar))
            .filter(|t| t.searchable_text().contains(&needle))
            .map(|t| SearchHit {
                kind: HitKind::Glossary,
                excerpt: excerpt(&t.definition),
                id: t.id,
                name: t.term,
                pillar: t.pillar,
                category: None,
            });

        let hits: Vec<SearchHit> = pattern_hits.chain(term_hits).collect();
        debug!(query = %query, pillar = ?pillar, hits = hits.len(), "Documentation search");
        Ok(hits)
    }

    /// All patterns, optionally filtered by pillar and (case-insensitive) category.
    pub async fn patterns(
        &self,
        pillar: Option<Pillar>,
        category: Option<&str>,
    ) -> AppResult<Vec<Pattern>> {
        let category = category.map(str::to_lowercase);
        let patterns = self
            .store
            .load_patterns()
            .await?
            .patterns
            .into_iter()
            .filter(|p| matches_pillar(p.pillar.as_deref(), pillar))
            .filter(|p| match &category {
                Some(wanted) => p
                    .category
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase() == *wanted),
                None => true,
            })
            .collect();
        Ok(patterns)
    }

    pub async fn pattern(&self, id: &str) -> AppResult<Pattern> {
        self.store
            .load_patterns()
            .await?
            .patterns
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Pattern {} not found", id)))
    }

    /// Glossary document with terms optionally narrowed to one pillar.
    pub async fn glossary(&self, pillar: Option<Pillar>) -> AppResult<GlossaryDocument> {
        let mut glossary = self.store.load_glossary().await?;
        glossary
            .terms
            .retain(|t| matches_pillar(t.pillar.as_deref(), pillar));
        Ok(glossary)
    }

    pub async fn term(&self, id: &str) -> AppResult<GlossaryTerm> {
        self.store
            .load_glossary()
            .await?
            .terms
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Term {} not found", id)))
    }

    /// Pillar metadata from the glossary document.
    pub async fn pillars(&self) -> AppResult<Map<String, Value>> {
        Ok(self.store.load_glossary().await?.pillars)
    }

    /// Counts computed from the documents as they are on disk now.
    pub async fn stats(&self) -> AppResult<DocsStats> {
        let patterns = self.store.load_patterns().await?.patterns;
        let terms = self.store.load_glossary().await?.terms;

        let mut patterns_by_pillar = BTreeMap::new();
        let mut categories = BTreeSet::new();
        for p in &patterns {
            let pillar = p.pillar.clone().unwrap_or_else(|| UNKNOWN_PILLAR.to_string());
            *patterns_by_pillar.entry(pillar).or_insert(0) += 1;
            categories.insert(
                p.category
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
            );
        }

        let mut terms_by_pillar = BTreeMap::new();
        for t in &terms {
            let pillar = t.pillar.clone().unwrap_or_else(|| UNKNOWN_PILLAR.to_string());
            *terms_by_pillar.entry(pillar).or_insert(0) += 1;
        }

        Ok(DocsStats {
            total_patterns: patterns.len(),
            total_terms: terms.len(),
            patterns_by_pillar,
            terms_by_pillar,
            categories: categories.into_iter().collect(),
        })
    }

    /// Patterns and terms linked to a theory module, in document order.
    pub async fn related(&self, module_id: u32) -> AppResult<RelatedDocs> {
        let links = module_links(module_id);

        let patterns = self
            .store
            .load_patterns()
            .await?
            .patterns
            .into_iter()
            .filter(|p| links.patterns.iter().any(|id| *id == p.id))
            .collect();
        let terms = self
            .store
            .load_glossary()
            .await?
            .terms
            .into_iter()
            .filter(|t| links.terms.iter().any(|id| *id == t.id))
            .collect();

        Ok(RelatedDocs {
            module_id,
            patterns,
            terms,
        })
    }
}

fn matches_pillar(record: Option<&str>, wanted: Option<Pillar>) -> bool {
    match wanted {
        Some(pillar) => record == Some(pillar.as_str()),
        None => true,
    }
}

/// First [`EXCERPT_LEN`] characters followed by `...`.
fn excerpt(text: &str) -> String {
    let mut out: String = text.chars().take(EXCERPT_LEN).collect();
    out.push_str("...");
    out
}
