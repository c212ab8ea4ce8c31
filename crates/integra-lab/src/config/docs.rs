//! Documentation source configuration.

use std::path::PathBuf;

use serde::Deserialize;

/// Locations of the pattern and glossary documents.
///
/// Environment variables are prefixed with `INTEGRA_DOCS_`:
/// - `INTEGRA_DOCS_DIR`: Directory holding both files (default: "content/docs")
/// - `INTEGRA_DOCS_PATTERNS_FILE`: Override for the patterns document
/// - `INTEGRA_DOCS_GLOSSARY_FILE`: Override for the glossary document
/// - `INTEGRA_DOCS_STRICT`: Treat missing or malformed files as errors (default: false)
#[derive(Debug, Clone, Deserialize)]
pub struct DocsConfig {
    /// Base directory
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Explicit patterns file
    #[serde(default)]
    pub patterns_file: Option<PathBuf>,

    /// Explicit glossary file
    #[serde(default)]
    pub glossary_file: Option<PathBuf>,

    /// Surface source errors instead of serving empty collections
    #[serde(default)]
    pub strict: bool,
}

fn default_dir() -> PathBuf {
    PathBuf::from("content/docs")
}

impl DocsConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("INTEGRA_DOCS_").from_env::<DocsConfig>()
    }

    /// Configuration rooted at `dir` with default file names.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Resolved path of `patterns.json`.
    pub fn patterns_path(&self) -> PathBuf {
        self.patterns_file
            .clone()
            .unwrap_or_else(|| self.dir.join("patterns.json"))
    }

    /// Resolved path of `glossary.json`.
    pub fn glossary_path(&self) -> PathBuf {
        self.glossary_file
            .clone()
            .unwrap_or_else(|| self.dir.join("glossary.json"))
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            patterns_file: None,
            glossary_file: None,
            strict: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = DocsConfig::default();
        assert_eq!(config.patterns_path(), PathBuf::from("content/docs/patterns.json"));
        assert_eq!(config.glossary_path(), PathBuf::from("content/docs/glossary.json"));
        assert!(!config.strict);
    }

    #[test]
    fn test_file_override() {
        let mut config = DocsConfig::with_dir("/srv/docs");
        config.glossary_file = Some(PathBuf::from("/tmp/terms.json"));
        assert_eq!(config.patterns_path(), PathBuf::from("/srv/docs/patterns.json"));
        assert_eq!(config.glossary_path(), PathBuf::from("/tmp/terms.json"));
    }
}
