//! Registration binary.
//!
//! Entry point for the `mlregistrar` tool: parses the component's flag
//! contract, sets up logging, and runs the registration flow.

use clap::Parser;
use mlregistrar_core::cli::{handlers::handle_register, options::Cli};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(
                    cli.effective_level().parse().unwrap_or(Level::INFO).into(),
                )
                .parse_lossy(cli.log_filter.as_deref().unwrap_or("")),
        )
        .with_target(true)
        .init();

    info!("mlregistrar starting up");

    handle_register(&cli).await?;

    Ok(())
}
