//! mtss CLI binary entry point
//!
//! Sets up logging and calls the library's `run_cli()` function.

use anyhow::Result;
use mtss_cli::run_cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for normalize and catalog output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    run_cli()
}
