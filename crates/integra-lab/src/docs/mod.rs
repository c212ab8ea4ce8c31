//! Documentation corpus: integration patterns and glossary.
//!
//! Read-only queries over two JSON documents loaded from disk per request.

pub mod models;
pub mod related;
pub mod service;
pub mod store;

pub use models::{
    DocsStats, GlossaryDocument, GlossaryTerm, HitKind, Pattern, RelatedDocs, SearchHit,
};
pub use service::DocsService;
pub use store::DocsStore;
