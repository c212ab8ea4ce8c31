//! HTTP handlers for the Integra Lab API.
//!
//! This module contains all route handlers organized by domain.

pub mod docs;
pub mod health;
pub mod sandbox;

pub use health::{api_health, health_check};
