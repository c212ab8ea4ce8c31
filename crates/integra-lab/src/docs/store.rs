//! File-backed documentation store.
//!
//! Documents are read from disk on every call; there is no cache, so edits
//! to the JSON files are visible on the next request.
//!
//! By default a missing or malformed file yields an empty collection and a
//! warning in the log. With `strict` set, the same conditions are returned
//! as [`AppError::DocsSource`].

use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::DocsConfig;
use crate::error::{AppError, AppResult};
use crate::result_ext::ResultExt;

use super::models::{GlossaryDocument, PatternsDocument};

/// Reads `patterns.json` and `glossary.json`.
#[derive(Debug, Clone)]
pub struct DocsStore {
    config: DocsConfig,
}

impl DocsStore {
    pub fn new(config: DocsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DocsConfig {
        &self.config
    }

    pub async fn load_patterns(&self) -> AppResult<PatternsDocument> {
        self.read_document(&self.config.patterns_path()).await
    }

    pub async fn load_glossary(&self) -> AppResult<GlossaryDocument> {
        self.read_document(&self.config.glossary_path()).await
    }

    /// Whether both source files currently exist.
    pub async fn sources_present(&self) -> bool {
        let patterns = tokio::fs::try_exists(self.config.patterns_path()).await;
        let glossary = tokio::fs::try_exists(self.config.glossary_path()).await;
        matches!((patterns, glossary), (Ok(true), Ok(true)))
    }

    async fn read_document<T>(&self, path: &Path) -> AppResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound && !self.config.strict => {
                debug!(path = %path.display(), "Documentation source missing, using empty collection");
                return Ok(T::default());
            }
            Err(e) => return self.degrade(format!("cannot read {}: {}", path.display(), e)),
        };

        match serde_json::from_str(&raw) {
            Ok(document) => Ok(document),
            Err(e) => self.degrade(format!("malformed {}: {}", path.display(), e)),
        }
    }

    fn degrade<T: Default>(&self, message: String) -> AppResult<T> {
        let failed: AppResult<T> = Err(AppError::DocsSource(message));
        if self.config.strict {
            failed.log("loading documentation source")
        } else {
            Ok(failed
                .log_warn("serving empty documentation collection")
                .unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir, strict: bool) -> DocsStore {
        let mut config = DocsConfig::with_dir(dir.path());
        config.strict = strict;
        DocsStore::new(config)
    }

    #[tokio::test]
    async fn test_missing_files_are_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, false);
        assert!(store.load_patterns().await.unwrap().patterns.is_empty());
        assert!(store.load_glossary().await.unwrap().terms.is_empty());
        assert!(!store.sources_present().await);
    }

    #[tokio::test]
    async fn test_malformed_file_is_empty_when_lenient() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("patterns.json"), "{ not json").unwrap();
        let store = store_in(&dir, false);
        assert!(store.load_patterns().await.unwrap().patterns.is_empty());
    }

    #[tokio::test]
    async fn test_strict_mode_surfaces_errors() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("patterns.json"), "[1, 2]").unwrap();
        let store = store_in(&dir, true);
        assert!(matches!(
            store.load_patterns().await,
            Err(AppError::DocsSource(_))
        ));
        assert!(matches!(
            store.load_glossary().await,
            Err(AppError::DocsSource(_))
        ));
    }

    #[tokio::test]
    async fn test_reads_are_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patterns.json");
        fs::write(&path, r#"{"patterns": [{"id": "a"}]}"#).unwrap();
        let store = store_in(&dir, false);
        assert_eq!(store.load_patterns().await.unwrap().patterns.len(), 1);

        fs::write(&path, r#"{"patterns": [{"id": "a"}, {"id": "b"}]}"#).unwrap();
        assert_eq!(store.load_patterns().await.unwrap().patterns.len(), 2);
    }
}
