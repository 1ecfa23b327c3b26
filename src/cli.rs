//! CLI argument parsing for envprops
//!
//! This module provides the command-line interface using clap derive macros.
//!
//! # Options
//!
//! - `--config` / `-c`: YAML filter configuration (env: ENVPROPS_CONFIG)
//! - `--pattern` / `-p`: Selection pattern with one capture group (repeatable)
//! - `--ignore-case` / `-i`: Compile `--pattern` values case-insensitively
//! - `--replace` / `-r`: `FROM=TO` key replacement (repeatable, replaces defaults)
//! - `--no-replace`: Disable all key replacements
//! - `--preserve-case`: Keep the case of extracted keys
//! - `--env-file`: Read `KEY=VALUE` lines instead of the process environment
//! - `--format` / `-f`: Output format (properties/json/yaml/env)
//! - `--log-level` / `-l`: Log level (trace/debug/info/warn/error, env: ENVPROPS_LOG_LEVEL)
//!
//! # Precedence
//!
//! Patterns from the configuration file come first, followed by `--pattern`
//! values. Replacement and case flags override the configuration file.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;
use crate::filter::{FilterBuilder, KeyReplacements, PatternFlags};
use crate::output::{self, OutputFormat};
use crate::source;

/// envprops - turn environment variables into property maps
///
/// Selects variables whose name fully matches a pattern, keeps the part
/// captured by the pattern's single group, rewrites it (by default `_`
/// becomes `.`) and lower-cases it.
#[derive(Parser, Debug)]
#[command(name = "envprops")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a YAML filter configuration
    #[arg(short, long, value_name = "FILE", env = "ENVPROPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Selection pattern with exactly one capture group, e.g. '^KAFKA_(.+)$'
    #[arg(short, long = "pattern", value_name = "REGEX")]
    pub patterns: Vec<String>,

    /// Compile --pattern values case-insensitively
    #[arg(short, long)]
    pub ignore_case: bool,

    /// Key replacement as FROM=TO, applied in order (replaces the defaults)
    #[arg(
        short,
        long = "replace",
        value_name = "FROM=TO",
        value_parser = parse_replacement
    )]
    pub replacements: Vec<(String, String)>,

    /// Disable all key replacements
    #[arg(long, conflicts_with = "replacements")]
    pub no_replace: bool,

    /// Keep the case of extracted keys
    #[arg(long)]
    pub preserve_case: bool,

    /// Read KEY=VALUE lines from a file instead of the process environment
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "properties")]
    pub format: OutputFormat,

    /// Log level
    #[arg(
        short,
        long,
        value_enum,
        default_value = "warn",
        env = "ENVPROPS_LOG_LEVEL"
    )]
    pub log_level: LogLevel,
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warn level - default
    Warn,
    /// Error level - least verbose
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Parse a `FROM=TO` replacement argument
fn parse_replacement(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((from, _)) if from.is_empty() => {
            Err("replacement source cannot be empty".to_string())
        }
        Some((from, to)) => Ok((from.to_string(), to.to_string())),
        None => Err(format!("expected FROM=TO, got '{}'", arg)),
    }
}

impl Cli {
    /// Assemble the filter builder described by the arguments
    ///
    /// # Errors
    /// Returns an error if the configuration or environment file cannot be
    /// loaded, or a pattern or replacement is invalid
    pub fn builder(&self) -> Result<FilterBuilder<String>> {
        let environment = match &self.env_file {
            Some(path) => source::load_env_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => source::process_environment(),
        };

        let mut builder = FilterBuilder::with_environment(environment);

        if let Some(path) = &self.config {
            let config = Config::load(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            builder = config.apply(builder)?;
        }

        let flags = PatternFlags::default().with_case_insensitive(self.ignore_case);
        for pattern in &self.patterns {
            builder = builder.pattern_with_flags(pattern, flags)?;
        }

        if self.no_replace {
            builder = builder.clear_key_replacements();
        } else if !self.replacements.is_empty() {
            let replacements = KeyReplacements::try_from(self.replacements.clone())?;
            builder = builder.key_replacements(replacements)?;
        }

        if self.preserve_case {
            builder = builder.lower_case_key(false);
        }

        if builder.patterns().is_empty() {
            tracing::warn!("No selection patterns configured, output will be empty");
        }

        Ok(builder)
    }

    /// Run the filter and render the result
    ///
    /// # Errors
    /// Returns an error if building, filtering or rendering fails
    pub fn execute(&self) -> Result<String> {
        let filter = self.builder()?.build();
        let props = filter.to_properties()?;
        tracing::info!(entries = props.len(), format = %self.format, "Filtered environment");
        Ok(output::render(&props, self.format)?)
    }
}
