use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod cli;
mod config;
mod errors;
mod forms;
mod handlers;
mod router;
mod schemas;
mod session;

#[cfg(test)]
mod test_utils;

use cli::Cli;

/// Log filter used when RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str =
    "carrental=debug,services=debug,model=debug,tower_http=debug,axum::rejection=trace";

/// Main entry point for the car rental application.
#[tokio::main]
async fn main() -> Result<()> {
    // `.env` is loaded first so it can set RUST_LOG and the flag fallbacks
    let cli = Cli::parse_with_env_file(None, std::env::args_os());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli.run().await
}
