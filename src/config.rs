//! Configuration management for envprops
//!
//! Handles loading and validating filter configuration from YAML files.
//!
//! ```yaml
//! patterns:
//!   - "^KAFKA_(.+)$"
//!   - pattern: "^app_(.+)$"
//!     flags:
//!       case_insensitive: true
//! key_replacements:
//!   - { from: "_", to: "." }
//! lower_case_key: true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::error::FilterError;
use crate::filter::{FilterBuilder, KeyReplacements, PatternFlags};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(#[from] FilterError),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Selection patterns, tried in order
    #[serde(default)]
    pub patterns: Vec<PatternSpec>,

    /// Key replacements; the `_` to `.` default applies when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_replacements: Option<KeyReplacements>,

    /// Lower-case output keys
    #[serde(default = "default_lower_case_key")]
    pub lower_case_key: bool,
}

/// A selection pattern entry, either bare text or text with flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
    /// Pattern text with default flags
    Text(String),
    /// Pattern text with explicit flags
    Detailed {
        pattern: String,
        #[serde(default)]
        flags: PatternFlags,
    },
}

impl PatternSpec {
    /// The pattern text
    pub fn pattern(&self) -> &str {
        match self {
            PatternSpec::Text(pattern) | PatternSpec::Detailed { pattern, .. } => pattern,
        }
    }

    /// The flags, defaulted for bare text
    pub fn flags(&self) -> PatternFlags {
        match self {
            PatternSpec::Text(_) => PatternFlags::default(),
            PatternSpec::Detailed { flags, .. } => *flags,
        }
    }
}

fn default_lower_case_key() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            key_replacements: None,
            lower_case_key: default_lower_case_key(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate configuration from YAML text
    ///
    /// # Errors
    /// Returns an error if the YAML is malformed or the configuration invalid
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Every pattern must compile and no replacement may have an empty
    /// source. Capture group counts are not checked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.apply(FilterBuilder::<String>::with_environment(
            Vec::<(String, String)>::new(),
        ))?;
        Ok(())
    }

    /// Apply this configuration on top of an existing builder
    ///
    /// Patterns are appended; replacements and the lower-case flag replace
    /// the builder's values when set.
    ///
    /// # Errors
    /// Returns an error if a pattern fails to compile or a replacement is invalid
    pub fn apply<V>(&self, builder: FilterBuilder<V>) -> Result<FilterBuilder<V>, FilterError> {
        let mut builder = builder.lower_case_key(self.lower_case_key);

        for spec in &self.patterns {
            builder = builder.pattern_with_flags(spec.pattern(), spec.flags())?;
        }

        if let Some(replacements) = &self.key_replacements {
            builder = builder.key_replacements(replacements.clone())?;
        }

        Ok(builder)
    }

    /// Build a filter builder over the given source mapping
    ///
    /// # Errors
    /// Returns an error if a pattern fails to compile or a replacement is invalid
    pub fn into_builder<V, K, I>(self, environment: I) -> Result<FilterBuilder<V>, FilterError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.apply(FilterBuilder::with_environment(environment))
    }
}
