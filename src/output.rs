//! Rendering of filtered maps
//!
//! Turns a filter result into text: Java-style `.properties`, JSON, YAML or
//! shell-style `KEY=VALUE` lines.
//!
//! # Properties Format
//!
//! ```text
//! # optional header
//! bootstrap.servers=broker\:9092
//! group.id=orders
//! ```

use clap::ValueEnum;
use indexmap::IndexMap;

use crate::error::OutputError;

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Java `.properties` text
    #[default]
    Properties,
    /// JSON object
    Json,
    /// YAML mapping
    Yaml,
    /// `KEY=VALUE` lines
    Env,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Properties => write!(f, "properties"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Env => write!(f, "env"),
        }
    }
}

/// Java properties formatter
///
/// # Example
///
/// ```ignore
/// use envprops::output::PropertiesFormatter;
///
/// let text = PropertiesFormatter::new()
///     .with_header("generated from environment")
///     .format(&props);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertiesFormatter {
    /// Comment emitted before the entries
    header: Option<String>,
}

impl PropertiesFormatter {
    /// Create a new formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a `#` comment line before the entries
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Format entries one `key=value` per line, in map order
    pub fn format(&self, props: &IndexMap<String, String>) -> String {
        let mut output = String::with_capacity(props.len() * 32);

        if let Some(header) = &self.header {
            for line in header.lines() {
                output.push_str("# ");
                output.push_str(line);
                output.push('\n');
            }
        }

        for (key, value) in props {
            output.push_str(&Self::escape(key, true));
            output.push('=');
            output.push_str(&Self::escape(value, false));
            output.push('\n');
        }

        output
    }

    /// Escape a key or value
    ///
    /// Keys escape every space; values only leading ones, as
    /// `java.util.Properties` does.
    fn escape(text: &str, is_key: bool) -> String {
        let mut escaped = String::with_capacity(text.len());
        let mut leading = true;

        for c in text.chars() {
            match c {
                ' ' if is_key || leading => escaped.push_str("\\ "),
                '\\' => escaped.push_str("\\\\"),
                '\t' => escaped.push_str("\\t"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\u{000C}' => escaped.push_str("\\f"),
                '=' | ':' | '#' | '!' => {
                    escaped.push('\\');
                    escaped.push(c);
                }
                _ => escaped.push(c),
            }
            if c != ' ' {
                leading = false;
            }
        }

        escaped
    }
}

/// Render a map in the requested format
///
/// # Errors
///
/// Returns an error if JSON or YAML serialization fails.
pub fn render(props: &IndexMap<String, String>, format: OutputFormat) -> Result<String, OutputError> {
    let rendered = match format {
        OutputFormat::Properties => PropertiesFormatter::new().format(props),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(props)?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => {
            if props.is_empty() {
                String::new()
            } else {
                serde_yaml::to_string(props)?
            }
        }
        OutputFormat::Env => format_env(props),
    };
    Ok(rendered)
}

/// Format entries as `KEY=VALUE` lines, quoting values that need it
fn format_env(props: &IndexMap<String, String>) -> String {
    let mut output = String::with_capacity(props.len() * 32);
    for (key, value) in props {
        output.push_str(key);
        output.push('=');
        if value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '$' | '#' | '`'))
        {
            output.push('"');
            for c in value.chars() {
                match c {
                    '"' | '\\' | '$' | '`' => {
                        output.push('\\');
                        output.push(c);
                    }
                    '\n' => output.push_str("\\n"),
                    _ => output.push(c),
                }
            }
            output.push('"');
        } else {
            output.push_str(value);
        }
        output.push('\n');
    }
    output
}
