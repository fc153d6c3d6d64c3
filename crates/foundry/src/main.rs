//! Foundry - multi-tenant industrial telemetry ingestion pipeline
//!
//! # Usage
//!
//! ```bash
//! # Run the ingestion server (reads configuration from the environment)
//! foundry serve
//!
//! # Validate configuration and exit
//! foundry check
//! ```

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Multi-tenant industrial telemetry ingestion pipeline
#[derive(Parser, Debug)]
#[command(name = "foundry")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Log level (trace, debug, info, warn, error). Overrides RUST_LOG.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the ingestion server (default)
    Serve(cmd::serve::ServeArgs),

    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.command {
        Some(Command::Serve(args)) => cmd::serve::run(args).await,
        Some(Command::Check) => cmd::check::run(),
        None => cmd::serve::run(cmd::serve::ServeArgs::default()).await,
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins when set; the `--log-level` flag overrides it.
fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
