//! Fluent construction of a [`Filter`]
//!
//! The builder only collects and validates configuration; all matching
//! happens in [`Filter::filter`]. Calling [`FilterBuilder::build`] takes a
//! snapshot, so later changes to the builder never reach a built filter.

use super::pattern::{PatternFlags, SelectionPattern};
use super::replace::KeyReplacements;
use super::Filter;
use crate::error::{FilterError, FilterResult};
use crate::source;

/// Configuration captured by a [`Filter`]
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig<V = String> {
    pub(crate) patterns: Vec<SelectionPattern>,
    pub(crate) environment: Vec<(String, V)>,
    pub(crate) key_replacements: KeyReplacements,
    pub(crate) lower_case_key: bool,
}

impl<V> FilterConfig<V> {
    /// Configuration over the given source with no patterns, the default
    /// `_` to `.` replacement and lower-casing enabled
    pub fn with_environment(environment: Vec<(String, V)>) -> Self {
        Self {
            patterns: Vec::new(),
            environment,
            key_replacements: KeyReplacements::default(),
            lower_case_key: true,
        }
    }

    /// Selection patterns in matching order
    pub fn patterns(&self) -> &[SelectionPattern] {
        &self.patterns
    }

    /// Source entries in iteration order
    pub fn environment(&self) -> &[(String, V)] {
        &self.environment
    }

    /// Key replacements in application order
    pub fn key_replacements(&self) -> &KeyReplacements {
        &self.key_replacements
    }

    /// Whether output keys are lower-cased
    pub fn lower_case_key(&self) -> bool {
        self.lower_case_key
    }
}

/// Builder for [`Filter`] instances
///
/// # Example
///
/// ```ignore
/// use envprops::filter::FilterBuilder;
///
/// let filter = FilterBuilder::with_environment([("FOO_BAR_BAZ", "This is a test".to_string())])
///     .pattern("^FOO_(.+)$")?
///     .build();
///
/// let map = filter.to_map()?;
/// assert_eq!(map["bar.baz"], "This is a test");
/// ```
#[derive(Debug, Clone)]
pub struct FilterBuilder<V = String> {
    config: FilterConfig<V>,
}

impl<V: From<String>> FilterBuilder<V> {
    /// Create a builder over a snapshot of the current process environment
    pub fn new() -> Self {
        Self::with_environment(
            source::process_environment()
                .into_iter()
                .map(|(key, value)| (key, V::from(value))),
        )
    }
}

impl<V: From<String>> Default for FilterBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FilterBuilder<V> {
    /// Create a builder over an explicit source mapping
    ///
    /// Entries are kept in the order the iterator yields them.
    pub fn with_environment<K, I>(environment: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            config: FilterConfig::with_environment(collect_entries(environment)),
        }
    }

    /// Replace the source mapping
    pub fn environment<K, I>(mut self, environment: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.config.environment = collect_entries(environment);
        self
    }

    /// Replace the source mapping with one that may be absent
    ///
    /// # Errors
    ///
    /// Returns `FilterError::MissingEnvironment` if `environment` is `None`.
    pub fn try_environment<K, I>(self, environment: Option<I>) -> FilterResult<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        match environment {
            Some(environment) => Ok(self.environment(environment)),
            None => Err(FilterError::MissingEnvironment),
        }
    }

    /// Compile and append a selection pattern
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidPattern` if the pattern is not valid regex.
    pub fn pattern(self, pattern: impl Into<String>) -> FilterResult<Self> {
        self.pattern_with_flags(pattern, PatternFlags::default())
    }

    /// Compile a selection pattern with engine flags and append it
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidPattern` if the pattern is not valid regex.
    pub fn pattern_with_flags(
        mut self,
        pattern: impl Into<String>,
        flags: PatternFlags,
    ) -> FilterResult<Self> {
        let compiled = SelectionPattern::compile(pattern, flags)?;
        tracing::debug!(pattern = %compiled, "Added selection pattern");
        self.config.patterns.push(compiled);
        Ok(self)
    }

    /// Append an already compiled selection pattern
    pub fn compiled_pattern(mut self, pattern: SelectionPattern) -> Self {
        self.config.patterns.push(pattern);
        self
    }

    /// Append a key replacement after the existing ones
    ///
    /// # Errors
    ///
    /// Returns `FilterError::EmptyReplacement` when `from` is empty.
    pub fn key_replacement(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> FilterResult<Self> {
        self.config.key_replacements.push(from, to)?;
        Ok(self)
    }

    /// Replace the whole key replacement list
    ///
    /// # Errors
    ///
    /// Returns `FilterError::EmptyReplacement` if any entry has an empty `from`.
    pub fn key_replacements(mut self, replacements: KeyReplacements) -> FilterResult<Self> {
        replacements.validate()?;
        self.config.key_replacements = replacements;
        Ok(self)
    }

    /// Drop all key replacements, including the default one
    pub fn clear_key_replacements(mut self) -> Self {
        self.config.key_replacements.clear();
        self
    }

    /// Set whether output keys are lower-cased
    pub fn lower_case_key(mut self, lower_case_key: bool) -> Self {
        self.config.lower_case_key = lower_case_key;
        self
    }

    /// Selection patterns added so far
    pub fn patterns(&self) -> &[SelectionPattern] {
        self.config.patterns()
    }

    /// Current source entries
    pub fn environment_entries(&self) -> &[(String, V)] {
        self.config.environment()
    }

    /// Current key replacements
    pub fn replacements(&self) -> &KeyReplacements {
        self.config.key_replacements()
    }

    /// Whether output keys will be lower-cased
    pub fn is_lower_case_key(&self) -> bool {
        self.config.lower_case_key
    }

    /// Consume the builder and return its configuration
    pub fn into_config(self) -> FilterConfig<V> {
        self.config
    }
}

impl<V: Clone> FilterBuilder<V> {
    /// Build a filter from a snapshot of the current configuration
    pub fn build(&self) -> Filter<V> {
        Filter::from_config(self.config.clone())
    }
}

fn collect_entries<K, V, I>(environment: I) -> Vec<(String, V)>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    environment
        .into_iter()
        .map(|(key, value)| (key.into(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> FilterBuilder<String> {
        FilterBuilder::with_environment([("FOO_BAR", "1".to_string())])
    }

    #[test]
    fn test_defaults() {
        let builder = builder();
        assert!(builder.patterns().is_empty());
        assert!(builder.is_lower_case_key());
        assert_eq!(builder.replacements(), &KeyReplacements::default());
        assert_eq!(builder.environment_entries().len(), 1);
    }

    #[test]
    fn test_new_reads_process_environment() {
        let builder: FilterBuilder<String> = FilterBuilder::new();
        let unicode_vars = std::env::vars_os()
            .filter(|(k, v)| k.to_str().is_some() && v.to_str().is_some())
            .count();
        assert_eq!(builder.environment_entries().len(), unicode_vars);
    }

    #[test]
    fn test_pattern_appends_in_order() {
        let builder = builder()
            .pattern("^FOO_(.+)$")
            .unwrap()
            .pattern_with_flags("^bar_(.+)$", PatternFlags::case_insensitive())
            .unwrap();

        let patterns: Vec<&str> = builder.patterns().iter().map(|p| p.as_str()).collect();
        assert_eq!(patterns, vec!["^FOO_(.+)$", "^bar_(.+)$"]);
        assert!(builder.patterns()[1].flags().case_insensitive);
    }

    #[test]
    fn test_pattern_invalid_regex() {
        let result = builder().pattern("^FOO_(.+$");
        match result {
            Err(err) => {
                assert!(err.is_invalid_argument());
                assert_eq!(err.pattern(), Some("^FOO_(.+$"));
            }
            Ok(_) => panic!("Expected InvalidPattern error"),
        }
    }

    #[test]
    fn test_pattern_group_count_not_checked_when_added() {
        let builder = builder().pattern("^(FOO)_(.+)$").unwrap();
        assert_eq!(builder.patterns()[0].group_count(), 2);
    }

    #[test]
    fn test_try_environment_absent() {
        let result = builder().try_environment::<String, Vec<(String, String)>>(None);
        assert!(matches!(result, Err(FilterError::MissingEnvironment)));
    }

    #[test]
    fn test_try_environment_present() {
        let builder = builder()
            .try_environment(Some(vec![("A", "1".to_string()), ("B", "2".to_string())]))
            .unwrap();
        let keys: Vec<&str> = builder
            .environment_entries()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, vec!["A", "B"]);
    }

    #[test]
    fn test_key_replacement_setters() {
        let builder = builder().key_replacement("-", "_").unwrap();
        assert_eq!(builder.replacements().len(), 2);

        let builder = builder.clear_key_replacements();
        assert!(builder.replacements().is_empty());

        let builder = builder
            .key_replacements(KeyReplacements::try_from(vec![("__", ".")]).unwrap())
            .unwrap();
        assert_eq!(builder.replacements().len(), 1);

        assert!(builder.key_replacement("", ".").is_err());
    }

    #[test]
    fn test_build_snapshots_configuration() {
        let builder = builder().pattern("^FOO_(.+)$").unwrap();
        let filter = builder.build();

        let builder = builder
            .pattern("^(.+)$")
            .unwrap()
            .clear_key_replacements()
            .lower_case_key(false)
            .environment([("OTHER", "2".to_string())]);

        assert_eq!(builder.patterns().len(), 2);
        assert_eq!(filter.config().patterns().len(), 1);
        assert_eq!(filter.config().key_replacements().len(), 1);
        assert!(filter.config().lower_case_key());
        assert_eq!(filter.config().environment()[0].0, "FOO_BAR");
    }

    #[test]
    fn test_compiled_pattern_matches_pattern_by_text() {
        let precompiled =
            SelectionPattern::compile("^FOO_(.+)$", PatternFlags::default()).unwrap();
        let from_compiled = builder().compiled_pattern(precompiled);
        let from_text = builder().pattern("^FOO_(.+)$").unwrap();

        assert_eq!(from_compiled.patterns(), from_text.patterns());
        assert_eq!(
            from_compiled.build().filter().unwrap(),
            from_text.build().filter().unwrap()
        );
    }

    #[test]
    fn test_compiled_pattern_group_count_checked_on_match() {
        let two_groups =
            SelectionPattern::compile("^(FOO)_(.+)$", PatternFlags::default()).unwrap();
        let filter = builder().compiled_pattern(two_groups.clone()).build();
        assert!(matches!(
            filter.filter(),
            Err(FilterError::CaptureGroupCount { groups: 2, .. })
        ));

        let unused = FilterBuilder::with_environment([("BAR", "1".to_string())])
            .compiled_pattern(two_groups)
            .build();
        assert!(unused.filter().unwrap().is_empty());
    }

    #[test]
    fn test_into_config() {
        let config = builder().lower_case_key(false).into_config();
        assert!(!config.lower_case_key());
        assert!(config.patterns().is_empty());
    }
}
