//! envprops - environment variables to properties
//!
//! This binary filters the process environment (or a `.env` file) with
//! selection patterns and prints the result.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use envprops::cli::Cli;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    envprops::init_logging(cli.log_level.into())?;

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %cli.log_level,
        "Starting envprops"
    );

    let rendered = cli.execute()?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
