//! Environment filtering
//!
//! A [`Filter`] selects keys from a source mapping with regex patterns,
//! extracts the part captured by the pattern's single group, rewrites it
//! with literal replacements and optionally lower-cases it.
//!
//! # Example
//!
//! ```ignore
//! use envprops::filter::FilterBuilder;
//!
//! let filter = FilterBuilder::with_environment([
//!     ("KAFKA_BOOTSTRAP_SERVERS", "broker:9092".to_string()),
//!     ("HOME", "/root".to_string()),
//! ])
//! .pattern("^KAFKA_(.+)$")?
//! .build();
//!
//! let props = filter.filter()?;
//! assert_eq!(props["bootstrap.servers"], "broker:9092");
//! assert_eq!(props.len(), 1);
//! ```

pub mod builder;
pub mod pattern;
pub mod replace;

pub use builder::{FilterBuilder, FilterConfig};
pub use pattern::{PatternFlags, SelectionPattern};
pub use replace::{KeyReplacement, KeyReplacements};

use indexmap::IndexMap;

use crate::error::FilterResult;

/// Result of a filter pass, in match order
pub type FilteredMap<V> = IndexMap<String, V>;

/// Immutable filter over a snapshot of its configuration
#[derive(Debug, Clone)]
pub struct Filter<V = String> {
    config: FilterConfig<V>,
}

impl Filter<String> {
    /// Start building a filter over the current process environment
    pub fn builder() -> FilterBuilder<String> {
        FilterBuilder::new()
    }
}

impl<V> Filter<V> {
    /// Create a filter that owns the given configuration
    pub fn from_config(config: FilterConfig<V>) -> Self {
        Self { config }
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &FilterConfig<V> {
        &self.config
    }

    /// Turn an extracted key into an output key
    fn output_key(&self, captured: &str) -> String {
        let key = self.config.key_replacements.apply(captured);
        if self.config.lower_case_key {
            key.to_lowercase()
        } else {
            key
        }
    }
}

impl<V: Clone> Filter<V> {
    /// Run the filter over its configured source mapping
    ///
    /// Every pattern is tried against every entry, entries first. When two
    /// matches produce the same output key the later one wins, keeping the
    /// position of the first.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::CaptureGroupCount` as soon as a pattern without
    /// exactly one capture group matches a key. No partial result is returned.
    pub fn filter(&self) -> FilterResult<FilteredMap<V>> {
        self.apply(self.config.environment.iter().map(|(k, v)| (k, v)))
    }

    /// Same as [`Filter::filter`]
    pub fn to_map(&self) -> FilterResult<FilteredMap<V>> {
        self.filter()
    }

    /// Run the filter's patterns and replacements over another source
    ///
    /// # Errors
    ///
    /// See [`Filter::filter`].
    pub fn apply<'a, K, I>(&self, source: I) -> FilterResult<FilteredMap<V>>
    where
        K: AsRef<str> + ?Sized + 'a,
        V: 'a,
        I: IntoIterator<Item = (&'a K, &'a V)>,
    {
        let source = source.into_iter();
        let mut result = IndexMap::with_capacity(source.size_hint().0);
        let mut scanned = 0usize;

        for (key, value) in source {
            let key = key.as_ref();
            scanned += 1;
            tracing::trace!(key, "Processing entry");

            for pattern in &self.config.patterns {
                match pattern.extract(key)? {
                    Some(captured) => {
                        let output = self.output_key(captured);
                        tracing::trace!(
                            key,
                            pattern = %pattern,
                            output = %output,
                            "Pattern matched"
                        );
                        result.insert(output, value.clone());
                    }
                    None => {
                        tracing::trace!(key, pattern = %pattern, "Pattern did not match");
                    }
                }
            }
        }

        tracing::debug!(
            scanned,
            patterns = self.config.patterns.len(),
            matched = result.len(),
            "Filter pass complete"
        );

        Ok(result)
    }
}

impl<V: Clone + std::fmt::Display> Filter<V> {
    /// Run the filter and render every value as a string
    ///
    /// # Errors
    ///
    /// See [`Filter::filter`].
    pub fn to_properties(&self) -> FilterResult<IndexMap<String, String>> {
        Ok(self
            .filter()?
            .into_iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect())
    }
}
