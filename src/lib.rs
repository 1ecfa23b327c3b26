//! envprops library
//!
//! This crate selects environment variables with regex patterns and turns
//! them into property maps: `KAFKA_BOOTSTRAP_SERVERS=broker:9092` filtered
//! with `^KAFKA_(.+)$` becomes `bootstrap.servers=broker:9092`.

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod source;

pub use error::{FilterError, FilterResult};
pub use filter::{Filter, FilterBuilder, FilteredMap, PatternFlags};

use anyhow::Result;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging subsystem
///
/// Logs go to stderr so that stdout only carries the rendered properties.
///
/// # Arguments
/// * `level` - Default level when `RUST_LOG` is not set
///
/// # Errors
/// Returns an error if the logging system fails to initialize
pub fn init_logging(level: tracing::Level) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::from_level(level).into()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
