//! Literal key replacements
//!
//! Replacements run in order after a key has been extracted, each one a
//! literal replace-all over the output of the previous one.

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};

/// A single literal substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyReplacement {
    /// Substring to look for
    pub from: String,
    /// Text to put in its place
    pub to: String,
}

impl KeyReplacement {
    /// Create a replacement, rejecting an empty `from`
    ///
    /// # Errors
    ///
    /// Returns `FilterError::EmptyReplacement` when `from` is empty.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> FilterResult<Self> {
        let from = from.into();
        let to = to.into();
        if from.is_empty() {
            return Err(FilterError::EmptyReplacement { to });
        }
        Ok(Self { from, to })
    }

    /// Apply this replacement to every occurrence in `key`
    pub fn apply(&self, key: &str) -> String {
        key.replace(&self.from, &self.to)
    }
}

/// Ordered list of key replacements
///
/// Defaults to a single rule turning `_` into `.`, so `BOOTSTRAP_SERVERS`
/// becomes `BOOTSTRAP.SERVERS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyReplacements {
    replacements: Vec<KeyReplacement>,
}

impl Default for KeyReplacements {
    fn default() -> Self {
        Self {
            replacements: vec![KeyReplacement {
                from: "_".to_string(),
                to: ".".to_string(),
            }],
        }
    }
}

impl KeyReplacements {
    /// Create an empty replacement list
    pub fn new() -> Self {
        Self {
            replacements: Vec::new(),
        }
    }

    /// Append a replacement
    ///
    /// # Errors
    ///
    /// Returns `FilterError::EmptyReplacement` when `from` is empty.
    pub fn push(&mut self, from: impl Into<String>, to: impl Into<String>) -> FilterResult<()> {
        self.replacements.push(KeyReplacement::new(from, to)?);
        Ok(())
    }

    /// Remove every replacement
    pub fn clear(&mut self) {
        self.replacements.clear();
    }

    /// Get the number of replacements
    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    /// Check if there are no replacements
    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Iterate over the replacements in application order
    pub fn iter(&self) -> impl Iterator<Item = &KeyReplacement> {
        self.replacements.iter()
    }

    /// Apply all replacements in order
    pub fn apply(&self, key: &str) -> String {
        self.replacements
            .iter()
            .fold(key.to_string(), |acc, replacement| replacement.apply(&acc))
    }

    /// Check every entry, e.g. after deserializing
    ///
    /// # Errors
    ///
    /// Returns `FilterError::EmptyReplacement` for the first empty `from`.
    pub fn validate(&self) -> FilterResult<()> {
        match self.replacements.iter().find(|r| r.from.is_empty()) {
            Some(r) => Err(FilterError::EmptyReplacement { to: r.to.clone() }),
            None => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a KeyReplacements {
    type Item = &'a KeyReplacement;
    type IntoIter = std::slice::Iter<'a, KeyReplacement>;

    fn into_iter(self) -> Self::IntoIter {
        self.replacements.iter()
    }
}

impl<F, T> TryFrom<Vec<(F, T)>> for KeyReplacements
where
    F: Into<String>,
    T: Into<String>,
{
    type Error = FilterError;

    fn try_from(pairs: Vec<(F, T)>) -> FilterResult<Self> {
        let mut replacements = Self::new();
        for (from, to) in pairs {
            replacements.push(from, to)?;
        }
        Ok(replacements)
    }
}
