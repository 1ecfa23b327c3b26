//! Source mappings
//!
//! The filter itself never touches the process environment. This module is
//! the collaborator that supplies it, either as a snapshot of the running
//! process or parsed from a `.env`-style file.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SourceError;

/// `KEY=VALUE` with an optional leading `export`
static ENV_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?([A-Za-z_][A-Za-z0-9_.\-]*)\s*=\s*(.*?)\s*$")
        .expect("env line regex is valid")
});

/// Snapshot of the current process environment
///
/// Variables whose name or value is not valid UTF-8 are skipped.
pub fn process_environment() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                tracing::warn!(
                    key = %key.unwrap_or_else(|k| k.to_string_lossy().into_owned()),
                    "Skipping environment variable that is not valid UTF-8"
                );
                None
            }
        })
        .collect()
}

/// Parse `.env`-style content into ordered entries
///
/// Blank lines and lines starting with `#` are ignored. Values wrapped in
/// matching single or double quotes are unwrapped; no escapes or variable
/// expansion are applied.
///
/// # Errors
///
/// Returns `SourceError::MalformedLine` (1-based) for a line that is not a
/// comment and not a `KEY=VALUE` assignment.
pub fn parse_env(contents: &str) -> Result<Vec<(String, String)>, SourceError> {
    let mut entries = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let caps = ENV_LINE
            .captures(line)
            .ok_or_else(|| SourceError::MalformedLine {
                line: index + 1,
                content: line.to_string(),
            })?;

        let key = caps[1].to_string();
        let value = unquote(&caps[2]).to_string();
        entries.push((key, value));
    }

    Ok(entries)
}

/// Read and parse a `.env`-style file
///
/// # Errors
///
/// Returns `SourceError::Read` if the file cannot be read, or
/// `SourceError::MalformedLine` as for [`parse_env`].
pub fn load_env_file<P: AsRef<Path>>(path: P) -> Result<Vec<(String, String)>, SourceError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let entries = parse_env(&contents)?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "Loaded environment file");
    Ok(entries)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
