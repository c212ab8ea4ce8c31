//! Integra Lab Library
//!
//! A teaching server for enterprise integration patterns:
//!
//! - **Sandbox**: scripted scenario simulations that narrate a business flow
//!   (insurance policy issuance) across the Applications, Events and Data pillars
//! - **Documentation**: search and lookup over the pattern catalog and glossary
//!
//! Nothing here implements the patterns themselves. Circuit breakers, event
//! buses and CDC pipelines appear only as narrated output.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from environment variables
//! - [`docs`]: Documentation store and queries
//! - [`engine`]: Scenario simulation engine
//! - [`error`]: Custom error types with Axum integration
//! - [`handlers`]: HTTP route handlers
//! - [`router`]: Route table
//! - [`state`]: Shared application state
//!
//! ## Example
//!
//! ```ignore
//! use integra_lab::engine::{Cross04Scenario, ScenarioInput};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let report = Cross04Scenario::new().run(&ScenarioInput::default()).await?;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod docs;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod pillar;
pub mod result_ext;
pub mod router;
pub mod state;

pub use error::{AppError, AppResult};
pub use pillar::Pillar;
pub use result_ext::ResultExt;
