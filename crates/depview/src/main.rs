//! Depview CLI binary.

use anyhow::Result;
use depview::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Controlled via RUST_LOG, e.g. RUST_LOG=depview=debug,depview_graph=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("depview=info,depview_graph=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("Starting depview CLI");

    let cli = Cli::parse_args();
    cli.execute()?;

    tracing::debug!("Depview CLI completed successfully");
    Ok(())
}
