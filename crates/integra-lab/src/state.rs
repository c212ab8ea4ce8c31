//! Application state for the Integra Lab server.
//!
//! This module defines the shared application state that is
//! passed to handlers via Axum's state management.

use std::sync::Arc;

use crate::config::{AppConfig, DocsConfig};
use crate::docs::{DocsService, DocsStore};

/// Shared application state.
///
/// Holds only read-only resources. Scenario runs build their own state per
/// request and never touch this struct.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Documentation queries
    pub docs: DocsService,

    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create a new application state.
    pub fn new(config: AppConfig, docs_config: DocsConfig) -> Self {
        Self {
            config: Arc::new(config),
            docs: DocsService::new(DocsStore::new(docs_config)),
            start_time: std::time::Instant::now(),
        }
    }

    /// Get the server uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
