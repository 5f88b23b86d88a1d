//! The gateway's plain-text configuration format.
//!
//! Each entry is a single line terminated by `;`, entries are joined with a
//! newline:
//!
//! ```text
//! dta.mode=Any;
//! sep.display=2;
//! ```
//!
//! `/system/config` returns the *grouped* form (`category.key=value`) while
//! the per-category endpoints such as `/system/config/mqc` use the *flat*
//! form (`key=value`).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Split a payload into `(line number, path, value)` triples.
///
/// Entries are separated by `;\n`; a trailing `;` on the last entry is
/// optional and empty entries are skipped. The value is everything after
/// the first `=`.
fn entries(text: &str) -> impl Iterator<Item = Result<(usize, &str, &str), ParseError>> {
    text.split(";\n")
        .map(|line| line.strip_suffix(';').unwrap_or(line))
        .map(|line| line.trim_end_matches(['\r', '\n']))
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            line.split_once('=')
                .map(|(path, value)| (index + 1, path.trim(), value))
                .ok_or_else(|| ParseError::MissingSeparator {
                    line: index + 1,
                    content: line.to_string(),
                })
        })
}

/// Config values grouped by category (`category.key=value`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    categories: BTreeMap<String, FlatConfig>,
}

impl ConfigDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a single value.
    #[must_use]
    pub fn get(&self, category: &str, key: &str) -> Option<&str> {
        self.categories.get(category)?.get(key)
    }

    /// Insert or replace a value, creating the category if needed.
    pub fn set(
        &mut self,
        category: impl Into<String>,
        key: impl Into<String>,
        value: impl fmt::Display,
    ) {
        self.categories
            .entry(category.into())
            .or_default()
            .set(key, value);
    }

    /// Access all entries of one category.
    #[must_use]
    pub fn category(&self, category: &str) -> Option<&FlatConfig> {
        self.categories.get(category)
    }

    /// Iterate over `(category, entries)` pairs in category order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &FlatConfig)> {
        self.categories.iter().map(|(name, config)| (name.as_str(), config))
    }

    /// Total number of entries across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.values().map(FlatConfig::len).sum()
    }

    /// Whether the document holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromStr for ConfigDocument {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut document = Self::new();
        for entry in entries(text) {
            let (line, path, value) = entry?;
            let (category, key) = path
                .split_once('.')
                .filter(|(category, key)| !category.is_empty() && !key.is_empty())
                .ok_or_else(|| ParseError::MissingCategory {
                    line,
                    content: path.to_string(),
                })?;
            document.set(category, key, value);
        }
        Ok(document)
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (category, config) in &self.categories {
            for (key, value) in config.entries() {
                if !first {
                    f.write_str("\n")?;
                }
                first = false;
                write!(f, "{category}.{key}={value};")?;
            }
        }
        Ok(())
    }
}

/// Ungrouped config values (`key=value`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatConfig {
    values: BTreeMap<String, String>,
}

impl FlatConfig {
    /// Create an empty config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Look up a value, failing when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingEntry`] when `key` is not present.
    pub fn require(&self, key: &str) -> Result<&str, ParseError> {
        self.get(key)
            .ok_or_else(|| ParseError::MissingEntry(key.to_string()))
    }

    /// Insert or replace a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        self.values.insert(key.into(), value.to_string());
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the config holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromStr for FlatConfig {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut config = Self::new();
        for entry in entries(text) {
            let (_, key, value) = entry?;
            config.set(key, value);
        }
        Ok(config)
    }
}

impl fmt::Display for FlatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.values {
            if !first {
                f.write_str("\n")?;
            }
            first = false;
            write!(f, "{key}={value};")?;
        }
        Ok(())
    }
}
