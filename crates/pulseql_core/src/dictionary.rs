//! Keyword dictionaries for writing queries in an alternative vocabulary.
//!
//! A dictionary is a JSON object mapping an alternative token to the canonical
//! keyword it stands for, e.g. `{"PICK": "SELECT"}`. Entries written the other
//! way around (`{"SELECT": "PICK"}`) are recognized and flipped so the
//! canonical keyword is always the replacement.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::errors::{PulseError, Result};
use crate::keywords::{KEYWORDS, is_keyword};

/// An entry that didn't map onto the canonical vocabulary as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryWarning {
    /// Key was canonical and value wasn't, the entry was flipped.
    Reversed { alternative: String, keyword: String },
    /// Neither side is canonical. The substitution is still applied.
    UnknownKeyword { alternative: String, keyword: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordDictionary {
    /// Alternative token -> replacement.
    entries: HashMap<String, String>,
    warnings: Vec<DictionaryWarning>,
}

impl KeywordDictionary {
    /// Build a dictionary from raw `(key, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = HashMap::new();
        let mut warnings = Vec::new();

        for (key, value) in pairs {
            let (key, value) = (key.into(), value.into());
            match (is_keyword(&key), is_keyword(&value)) {
                (_, true) => {
                    entries.insert(key, value);
                }
                (true, false) => {
                    warnings.push(DictionaryWarning::Reversed {
                        alternative: value.clone(),
                        keyword: key.clone(),
                    });
                    entries.insert(value, key);
                }
                (false, false) => {
                    warnings.push(DictionaryWarning::UnknownKeyword {
                        alternative: key.clone(),
                        keyword: value.clone(),
                    });
                    entries.insert(key, value);
                }
            }
        }

        KeywordDictionary { entries, warnings }
    }

    /// Parse a dictionary from a JSON object of strings.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        // BTreeMap keeps flip resolution deterministic when both orientations
        // of the same word appear.
        let raw: BTreeMap<String, String> = serde_json::from_str(s)?;
        Ok(Self::from_pairs(raw))
    }

    /// Load a dictionary file, logging a warning for every entry that doesn't
    /// map onto a canonical keyword as written.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| PulseError::Dictionary {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let dict = Self::from_json_str(&content).map_err(|e| PulseError::Dictionary {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        for warning in dict.warnings() {
            match warning {
                DictionaryWarning::Reversed {
                    alternative,
                    keyword,
                } => warn!(
                    "Dictionary entry '{keyword}' -> '{alternative}' is reversed, treating '{alternative}' as an alternative for '{keyword}'"
                ),
                DictionaryWarning::UnknownKeyword { keyword, .. } => {
                    warn!("Keyword '{keyword}' not found in SQL standard dictionary")
                }
            }
        }

        Ok(dict)
    }

    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn warnings(&self) -> &[DictionaryWarning] {
        &self.warnings
    }

    /// The keywords a user of this dictionary types.
    ///
    /// Canonical keywords with a configured alternative are replaced by that
    /// alternative. Alternatives for unknown keywords are appended as is.
    pub fn vocabulary(&self) -> Vec<String> {
        let mut replaced: HashMap<String, Vec<&str>> = HashMap::new();
        for (alternative, keyword) in &self.entries {
            replaced
                .entry(keyword.to_ascii_uppercase())
                .or_default()
                .push(alternative);
        }

        let mut words = Vec::with_capacity(KEYWORDS.len());
        for keyword in KEYWORDS {
            match replaced.remove(*keyword) {
                Some(alternatives) => words.extend(alternatives.into_iter().map(String::from)),
                None => words.push(keyword.to_string()),
            }
        }
        words.extend(replaced.into_values().flatten().map(String::from));
        words.sort();
        words
    }
}

/// Canonical vocabulary, or the dictionary's vocabulary if one is configured.
pub fn vocabulary(dictionary: Option<&KeywordDictionary>) -> Vec<String> {
    match dictionary {
        Some(dict) => dict.vocabulary(),
        None => KEYWORDS.iter().map(|s| s.to_string()).collect(),
    }
}
