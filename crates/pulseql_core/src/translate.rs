//! Keyword rewriting of queries through a [`KeywordDictionary`].
//!
//! Queries are split on single spaces and every token that exactly matches a
//! dictionary key is replaced. Splitting and rejoining on the same separator
//! means a query that contains no key as a standalone token comes back
//! unchanged, including runs of spaces, tabs and newlines.

use std::sync::Arc;

use crate::dictionary::KeywordDictionary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewriteMode {
    /// Rewrite every matching token, including tokens inside string literals
    /// (`'PICK me'` becomes `'SELECT me'`).
    Naive,
    /// Leave tokens that start inside a quoted span or a comment untouched.
    #[default]
    QuoteAware,
}

#[derive(Debug, Clone)]
pub struct QueryTranslator {
    dictionary: Arc<KeywordDictionary>,
    mode: RewriteMode,
}

impl QueryTranslator {
    pub fn new(dictionary: Arc<KeywordDictionary>, mode: RewriteMode) -> Self {
        QueryTranslator { dictionary, mode }
    }

    pub fn dictionary(&self) -> &KeywordDictionary {
        &self.dictionary
    }

    pub fn mode(&self) -> RewriteMode {
        self.mode
    }

    /// Rewrite `query` into the canonical vocabulary.
    pub fn translate(&self, query: &str) -> String {
        let mut scan = ScanState::default();
        let mut out = String::with_capacity(query.len());

        for (idx, token) in query.split(' ').enumerate() {
            if idx > 0 {
                out.push(' ');
            }

            let rewritable = match self.mode {
                RewriteMode::Naive => true,
                RewriteMode::QuoteAware => scan.is_code(),
            };

            match self.dictionary.lookup(token) {
                Some(replacement) if rewritable => out.push_str(replacement),
                _ => out.push_str(token),
            }

            scan.advance(token);
        }

        out
    }
}

/// Tracks whether the scan position is inside a quoted span or a comment.
///
/// Doubled quotes (`'it''s'`) toggle twice and so need no special casing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ScanState {
    #[default]
    Code,
    SingleQuote,
    DoubleQuote,
    /// `--` up to the end of the line.
    LineComment,
    /// `/*` up to the next `*/`.
    BlockComment,
}

impl ScanState {
    fn is_code(self) -> bool {
        self == ScanState::Code
    }

    fn advance(&mut self, text: &str) {
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            *self = match (*self, c) {
                (ScanState::Code, '\'') => ScanState::SingleQuote,
                (ScanState::Code, '"') => ScanState::DoubleQuote,
                (ScanState::Code, '-') if chars.next_if_eq(&'-').is_some() => {
                    ScanState::LineComment
                }
                (ScanState::Code, '/') if chars.next_if_eq(&'*').is_some() => {
                    ScanState::BlockComment
                }
                (ScanState::SingleQuote, '\'') | (ScanState::DoubleQuote, '"') => ScanState::Code,
                (ScanState::LineComment, '\n') => ScanState::Code,
                (ScanState::BlockComment, '*') if chars.next_if_eq(&'/').is_some() => {
                    ScanState::Code
                }
                (state, _) => state,
            };
        }
    }
}
