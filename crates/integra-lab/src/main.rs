//! Integra Lab Server
//!
//! Serves the sandbox scenarios and the pattern documentation over HTTP, or
//! runs a scenario once from the command line and prints its trace.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use integra_lab::{
    config::{AppConfig, DocsConfig, LogFormat},
    engine::{ScenarioInput, ScenarioKind},
    router::build_router,
    state::AppState,
    AppError, ResultExt,
};

#[derive(Parser)]
#[command(name = "integra-lab")]
#[command(version, about = "Integration patterns lab: sandbox scenarios and pattern docs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Override INTEGRA_PORT
        #[arg(short, long)]
        port: Option<u16>,

        /// Override INTEGRA_DOCS_DIR
        #[arg(long)]
        docs_dir: Option<PathBuf>,
    },
    /// Run a sandbox scenario once and print the trace as JSON
    ///
    /// Examples:
    ///     integra-lab scenario
    ///     integra-lab scenario CROSS-04 --input request.json
    #[command(verbatim_doc_comment)]
    Scenario {
        /// Scenario id
        #[arg(value_name = "ID", default_value = "CROSS-04")]
        id: String,

        /// Path to a JSON file with the initial input
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
}

/// Initialize tracing/logging.
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,integra_lab=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    // stderr keeps stdout clean for `scenario` output
    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    match format {
        LogFormat::Pretty => registry.with(fmt).init(),
        LogFormat::Json => registry.with(fmt.json()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Tracing is not up yet, so this failure goes straight to stderr
    let mut app_config = AppConfig::from_env().map_err(AppError::from).unwrap_or_else(|e| {
        eprintln!("{e}, using defaults");
        AppConfig::default()
    });

    init_tracing(app_config.log_format);

    match cli.command {
        Some(Commands::Scenario { id, input, compact }) => {
            run_scenario(&app_config, &id, input, compact).await
        }
        Some(Commands::Serve { port, docs_dir }) => {
            if let Some(port) = port {
                app_config.port = port;
            }
            serve(app_config, docs_dir).await
        }
        None => serve(app_config, None).await,
    }
}

async fn run_scenario(
    config: &AppConfig,
    id: &str,
    input: Option<PathBuf>,
    compact: bool,
) -> anyhow::Result<()> {
    let kind = ScenarioKind::find(id).with_context(|| format!("unknown scenario '{}'", id))?;

    let input: ScenarioInput = match input {
        Some(path) => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        None => ScenarioInput::default(),
    };

    let report = kind.run(&input, config.step_delay()).await?;
    println!("{}", report.render(compact)?);
    Ok(())
}

async fn serve(app_config: AppConfig, docs_dir: Option<PathBuf>) -> anyhow::Result<()> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Integra Lab"
    );

    let mut docs_config = DocsConfig::from_env()
        .map_err(AppError::from)
        .log_warn("loading docs config, using defaults")
        .unwrap_or_default();
    if let Some(dir) = docs_dir {
        docs_config.dir = dir;
    }

    tracing::info!(
        host = %app_config.host,
        port = app_config.port,
        debug = app_config.debug,
        patterns = %docs_config.patterns_path().display(),
        glossary = %docs_config.glossary_path().display(),
        strict_docs = docs_config.strict,
        "Configuration loaded"
    );

    let addr: SocketAddr = app_config.bind_address().parse()?;
    let state = AppState::new(app_config, docs_config);
    if !state.docs.store().sources_present().await {
        tracing::warn!("Documentation sources missing, docs endpoints will serve empty collections");
    }

    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
