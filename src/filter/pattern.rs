//! Selection patterns
//!
//! A selection pattern both selects a key and extracts the part of it that
//! becomes the output key. Patterns are matched against the *whole* key,
//! and a pattern that matches must define exactly one capture group.
//!
//! # Example
//!
//! ```ignore
//! use envprops::filter::{PatternFlags, SelectionPattern};
//!
//! let pattern = SelectionPattern::compile("^KAFKA_(.+)$", PatternFlags::default())?;
//! assert_eq!(pattern.extract("KAFKA_BOOTSTRAP_SERVERS")?, Some("BOOTSTRAP_SERVERS"));
//! ```

use regex::{Captures, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};

/// Regex engine flags applied when compiling a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternFlags {
    /// Match letters regardless of case (`i`)
    pub case_insensitive: bool,
    /// `^` and `$` match at line boundaries (`m`)
    pub multi_line: bool,
    /// `.` also matches `\n` (`s`)
    pub dot_matches_new_line: bool,
    /// Ignore whitespace and allow `#` comments (`x`)
    pub ignore_whitespace: bool,
    /// Swap the meaning of greedy and lazy quantifiers (`U`)
    pub swap_greed: bool,
    /// Unicode-aware classes and case folding
    pub unicode: bool,
}

impl Default for PatternFlags {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            multi_line: false,
            dot_matches_new_line: false,
            ignore_whitespace: false,
            swap_greed: false,
            unicode: true,
        }
    }
}

impl PatternFlags {
    /// Flags with only case-insensitivity enabled
    pub fn case_insensitive() -> Self {
        Self {
            case_insensitive: true,
            ..Self::default()
        }
    }

    /// Set case-insensitive matching
    pub fn with_case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    /// Set multi-line mode
    pub fn with_multi_line(mut self, yes: bool) -> Self {
        self.multi_line = yes;
        self
    }

    /// Set dot-matches-newline mode
    pub fn with_dot_matches_new_line(mut self, yes: bool) -> Self {
        self.dot_matches_new_line = yes;
        self
    }

    /// Set extended (whitespace-insensitive) mode
    pub fn with_ignore_whitespace(mut self, yes: bool) -> Self {
        self.ignore_whitespace = yes;
        self
    }

    /// Set swapped greediness
    pub fn with_swap_greed(mut self, yes: bool) -> Self {
        self.swap_greed = yes;
        self
    }

    /// Set Unicode mode
    pub fn with_unicode(mut self, yes: bool) -> Self {
        self.unicode = yes;
        self
    }

    fn builder(&self, pattern: &str) -> RegexBuilder {
        let mut builder = RegexBuilder::new(pattern);
        builder
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .ignore_whitespace(self.ignore_whitespace)
            .swap_greed(self.swap_greed)
            .unicode(self.unicode);
        builder
    }
}

/// A compiled selection pattern
///
/// Holds the pattern text as written alongside a version anchored to the
/// whole input, so `^FOO_(.+)$` and `FOO_(.+)` select the same keys.
#[derive(Debug, Clone)]
pub struct SelectionPattern {
    pattern: String,
    flags: PatternFlags,
    anchored: Regex,
}

impl SelectionPattern {
    /// Compile a pattern with the given flags
    ///
    /// The capture group count is not checked here. A pattern with the wrong
    /// number of groups only fails once it matches a key.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidPattern` if the pattern is not valid regex.
    pub fn compile(pattern: impl Into<String>, flags: PatternFlags) -> FilterResult<Self> {
        let pattern = pattern.into();
        let invalid = |source: regex::Error| FilterError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        };

        // The raw text must stand on its own, otherwise something like
        // "a)(b" would be accepted once wrapped in the anchoring group.
        flags.builder(&pattern).build().map_err(invalid)?;

        // In extended mode, whether from the flag or an inline `(?x)`, a
        // trailing `#` comment swallows the closing anchor. The raw text is
        // known to be valid, so a failed wrap can only be that comment and a
        // newline terminator ends it.
        let anchored = match flags.builder(&format!(r"\A(?:{})\z", pattern)).build() {
            Ok(anchored) => anchored,
            Err(_) => flags
                .builder(&format!("\\A(?:{}\n)\\z", pattern))
                .build()
                .map_err(invalid)?,
        };

        Ok(Self {
            pattern,
            flags,
            anchored,
        })
    }

    /// The pattern text as written
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// The flags the pattern was compiled with
    pub fn flags(&self) -> PatternFlags {
        self.flags
    }

    /// Number of capture groups the pattern defines (excluding the whole match)
    pub fn group_count(&self) -> usize {
        self.anchored.captures_len() - 1
    }

    /// Match the whole key, returning the captures on success
    pub fn captures<'k>(&self, key: &'k str) -> Option<Captures<'k>> {
        self.anchored.captures(key)
    }

    /// Check whether the pattern matches the whole key
    pub fn is_match(&self, key: &str) -> bool {
        self.anchored.is_match(key)
    }

    /// Extract the candidate key from a matching input
    ///
    /// Returns `Ok(None)` when the key does not match. A group that did not
    /// take part in the match extracts as the empty string.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::CaptureGroupCount` if the key matches and the
    /// pattern does not define exactly one capture group.
    pub fn extract<'k>(&self, key: &'k str) -> FilterResult<Option<&'k str>> {
        let Some(caps) = self.captures(key) else {
            return Ok(None);
        };

        let groups = self.group_count();
        if groups != 1 {
            return Err(FilterError::CaptureGroupCount {
                pattern: self.pattern.clone(),
                groups,
            });
        }

        Ok(Some(caps.get(1).map_or("", |m| m.as_str())))
    }
}

impl PartialEq for SelectionPattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.flags == other.flags
    }
}

impl Eq for SelectionPattern {}

impl std::fmt::Display for SelectionPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(pattern: &str) -> SelectionPattern {
        SelectionPattern::compile(pattern, PatternFlags::default()).unwrap()
    }

    #[test]
    fn test_flags_default() {
        let flags = PatternFlags::default();
        assert!(!flags.case_insensitive);
        assert!(flags.unicode);
        assert_eq!(PatternFlags::case_insensitive(), flags.with_case_insensitive(true));
    }

    #[test]
    fn test_compile_keeps_pattern_text() {
        let pattern = compile("^FOO_(.+)$");
        assert_eq!(pattern.as_str(), "^FOO_(.+)$");
        assert_eq!(pattern.to_string(), "^FOO_(.+)$");
        assert_eq!(pattern.group_count(), 1);
    }

    #[test]
    fn test_compile_invalid() {
        let result = SelectionPattern::compile("FOO_([", PatternFlags::default());
        match result {
            Err(FilterError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "FOO_(["),
            other => panic!("Expected InvalidPattern error, got {:?}", other),
        }
    }

    #[test]
    fn test_compile_rejects_unbalanced_group_that_anchoring_would_hide() {
        let result = SelectionPattern::compile("a)(b", PatternFlags::default());
        assert!(matches!(result, Err(FilterError::InvalidPattern { .. })));
    }

    #[test]
    fn test_compile_does_not_check_group_count() {
        let pattern = compile("^(FOO)_(.+)$");
        assert_eq!(pattern.group_count(), 2);
        let pattern = compile("^FOO_.+$");
        assert_eq!(pattern.group_count(), 0);
    }

    #[test]
    fn test_full_string_match_only() {
        let pattern = compile("FOO_(.+)");
        assert!(pattern.is_match("FOO_BAR"));
        assert!(!pattern.is_match("XFOO_BAR"));

        let pattern = compile("FOO_([A-Z]+)");
        assert!(!pattern.is_match("FOO_BAR_1"));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let pattern = compile("A_(.+)|B");
        assert!(pattern.is_match("B"));
        assert!(!pattern.is_match("AB"));
        assert!(!pattern.is_match("xB"));
    }

    #[test]
    fn test_extract() {
        let pattern = compile("^FOO_(.+)$");
        assert_eq!(pattern.extract("FOO_BAR_BAZ").unwrap(), Some("BAR_BAZ"));
        assert_eq!(pattern.extract("BAR_FOO").unwrap(), None);
    }

    #[test]
    fn test_extract_optional_group_not_participating() {
        let pattern = compile("^FOO(_.+)?$");
        assert_eq!(pattern.extract("FOO").unwrap(), Some(""));
    }

    #[test]
    fn test_extract_wrong_group_count_only_on_match() {
        let pattern = compile("^(FOO)_(.+)$");
        assert_eq!(pattern.extract("BAR_BAZ").unwrap(), None);

        match pattern.extract("FOO_BAZ") {
            Err(FilterError::CaptureGroupCount { pattern, groups }) => {
                assert_eq!(pattern, "^(FOO)_(.+)$");
                assert_eq!(groups, 2);
            }
            other => panic!("Expected CaptureGroupCount error, got {:?}", other),
        }

        let pattern = compile("^FOO_.+$");
        assert!(matches!(
            pattern.extract("FOO_BAR"),
            Err(FilterError::CaptureGroupCount { groups: 0, .. })
        ));
    }

    #[test]
    fn test_case_insensitive_flag() {
        let pattern = SelectionPattern::compile("^foo_(.+)$", PatternFlags::case_insensitive())
            .unwrap();
        assert_eq!(pattern.extract("FOO_Bar").unwrap(), Some("Bar"));
        assert!(!compile("^foo_(.+)$").is_match("FOO_Bar"));
    }

    #[test]
    fn test_ignore_whitespace_with_trailing_comment() {
        let flags = PatternFlags::default().with_ignore_whitespace(true);
        let pattern = SelectionPattern::compile("FOO_ (.+) # prefix", flags).unwrap();
        assert_eq!(pattern.extract("FOO_BAR").unwrap(), Some("BAR"));
        assert!(!pattern.is_match("XFOO_BAR"));
    }

    #[test]
    fn test_inline_extended_mode_with_trailing_comment() {
        let pattern = compile("(?x)FOO_ (.+) # prefix");
        assert_eq!(pattern.group_count(), 1);
        assert_eq!(pattern.extract("FOO_BAR").unwrap(), Some("BAR"));
        assert!(!pattern.is_match("XFOO_BAR"));
        assert!(!pattern.is_match("FOO_BAR\n"));
    }

    #[test]
    fn test_pattern_equality() {
        assert_eq!(compile("^A_(.+)$"), compile("^A_(.+)$"));
        assert_ne!(
            compile("^A_(.+)$"),
            SelectionPattern::compile("^A_(.+)$", PatternFlags::case_insensitive()).unwrap()
        );
    }
}
