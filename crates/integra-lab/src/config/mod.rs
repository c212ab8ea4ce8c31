//! Configuration module for the Integra Lab server.
//!
//! This module provides configuration loading from environment variables
//! using the `envy` crate for type-safe environment variable parsing.

mod app;
mod docs;

pub use app::{AppConfig, LogFormat};
pub use docs::DocsConfig;
