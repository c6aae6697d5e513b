//! FinTrack Binary
//!
//! Personal finance tracker with currency conversion.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fintrack_app::{cli, Cli, FinanceTracker, LogFormat, TrackerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = TrackerConfig::from_env();

    // Initialize logging. Output goes to stderr so command output stays clean.
    let json = config.log_format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
        ))
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    info!(database_url = %config.database_url, "Starting FinTrack");

    let tracker = FinanceTracker::build(&config).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::run(&tracker, args, &mut out).await
}
