//! Documentation API handlers.
//!
//! Endpoints for searching and browsing the pattern catalog and glossary.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::docs::{DocsService, DocsStats, GlossaryDocument, GlossaryTerm, Pattern, RelatedDocs, SearchHit};
use crate::error::{AppError, AppResult};
use crate::pillar::Pillar;

/// Query parameters for search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub pillar: Option<String>,
}

/// Query parameters for the pattern list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternsQuery {
    pub pillar: Option<String>,
    pub category: Option<String>,
}

/// Query parameters accepting only a pillar filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PillarQuery {
    pub pillar: Option<String>,
}

/// Parse an optional pillar filter. An empty value means no filter.
fn parse_pillar(raw: Option<&str>) -> AppResult<Option<Pillar>> {
    match raw {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(AppError::Validation),
    }
}

/// Full-text search over patterns and glossary.
///
/// `GET /api/docs/search?q=<min 2 chars>&pillar=<optional>`
///
/// # Response
///
/// ```json
/// [
///   {"type": "pattern", "id": "api-gateway", "name": "API Gateway",
///    "pillar": "applications", "category": "Routing", "excerpt": "..."}
/// ]
/// ```
pub async fn search(
    State(service): State<DocsService>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<SearchHit>>> {
    let pillar = parse_pillar(query.pillar.as_deref())?;
    let q = query.q.unwrap_or_default();
    let hits = service.search(&q, pillar).await?;
    Ok(Json(hits))
}

/// List patterns.
///
/// `GET /api/docs/patterns?pillar=&category=`
pub async fn list_patterns(
    State(service): State<DocsService>,
    Query(query): Query<PatternsQuery>,
) -> AppResult<Json<Vec<Pattern>>> {
    let pillar = parse_pillar(query.pillar.as_deref())?;
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    Ok(Json(service.patterns(pillar, category).await?))
}

/// Get a pattern by id.
///
/// `GET /api/docs/patterns/{pattern_id}`
pub async fn get_pattern(
    State(service): State<DocsService>,
    Path(pattern_id): Path<String>,
) -> AppResult<Json<Pattern>> {
    Ok(Json(service.pattern(&pattern_id).await?))
}

/// Glossary with pillar metadata.
///
/// `GET /api/docs/glossary?pillar=`
pub async fn get_glossary(
    State(service): State<DocsService>,
    Query(query): Query<PillarQuery>,
) -> AppResult<Json<GlossaryDocument>> {
    let pillar = parse_pillar(query.pillar.as_deref())?;
    Ok(Json(service.glossary(pillar).await?))
}

/// Get a glossary term by id.
///
/// `GET /api/docs/glossary/{term_id}`
pub async fn get_term(
    State(service): State<DocsService>,
    Path(term_id): Path<String>,
) -> AppResult<Json<GlossaryTerm>> {
    Ok(Json(service.term(&term_id).await?))
}

/// Pillar metadata keyed by pillar id.
///
/// `GET /api/docs/pillars`
pub async fn get_pillars(State(service): State<DocsService>) -> AppResult<Json<Map<String, Value>>> {
    Ok(Json(service.pillars().await?))
}

/// Corpus statistics.
///
/// `GET /api/docs/stats`
pub async fn get_stats(State(service): State<DocsService>) -> AppResult<Json<DocsStats>> {
    Ok(Json(service.stats().await?))
}

/// Documentation related to a theory module (1-16).
///
/// `GET /api/docs/related/{module_id}`
pub async fn get_related(
    State(service): State<DocsService>,
    Path(module_id): Path<String>,
) -> AppResult<Json<RelatedDocs>> {
    let module_id = parse_module_id(&module_id)?;
    Ok(Json(service.related(module_id).await?))
}

fn parse_module_id(raw: &str) -> AppResult<u32> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("Invalid module id '{}'", raw)))
}
