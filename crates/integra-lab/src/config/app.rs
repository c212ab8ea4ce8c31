//! Application configuration for the Integra Lab server.

use serde::Deserialize;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable fmt layer.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Application configuration loaded from environment variables.
///
/// Environment variables are prefixed with `INTEGRA_`:
/// - `INTEGRA_HOST`: Server bind address (default: "0.0.0.0")
/// - `INTEGRA_PORT`: Server port (default: 8090)
/// - `INTEGRA_DEBUG`: Enable debug mode (default: false)
/// - `INTEGRA_SERVER_NAME`: Server name for identification
/// - `INTEGRA_LOG_FORMAT`: `pretty` or `json`
/// - `INTEGRA_STEP_DELAY_MS`: Pause inside every scenario step (default: 0)
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable debug mode
    #[serde(default)]
    pub debug: bool,

    /// Server name for identification
    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Artificial pacing for scenario steps, in milliseconds
    #[serde(default)]
    pub step_delay_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_server_name() -> String {
    "integra-lab".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `INTEGRA_`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("INTEGRA_").from_env::<AppConfig>()
    }

    /// Get the server bind address as a string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Step pacing as a `Duration`.
    pub fn step_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.step_delay_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
            server_name: default_server_name(),
            log_format: LogFormat::default(),
            step_delay_ms: 0,
        }
    }
}
