use std::collections::HashSet;

use nu_ansi_term::{Color, Style};
use reedline::{Completer, Highlighter, Span, StyledText, Suggestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Keyword,
    Word,
    Number,
    String,
    Comment,
    Punctuation,
    Whitespace,
    Other,
}

/// Splits a console line into styled spans. Never fails: unterminated
/// strings and comments run to the end of the line.
fn tokenize<'a>(line: &'a str, keywords: &HashSet<String>) -> Vec<(TokenKind, &'a str)> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        let kind = if c.is_whitespace() {
            advance_while(&mut chars, |c| c.is_whitespace());
            TokenKind::Whitespace
        } else if c == '\'' || c == '"' {
            chars.next();
            for (_, next) in chars.by_ref() {
                if next == c {
                    break;
                }
            }
            TokenKind::String
        } else if line[start..].starts_with("--") {
            advance_while(&mut chars, |c| c != '\n');
            TokenKind::Comment
        } else if line[start..].starts_with("/*") {
            chars.next();
            chars.next();
            let mut prev = '\0';
            for (_, next) in chars.by_ref() {
                if prev == '*' && next == '/' {
                    break;
                }
                prev = next;
            }
            TokenKind::Comment
        } else if c.is_ascii_digit() {
            advance_while(&mut chars, |c| c.is_ascii_digit() || c == '.');
            TokenKind::Number
        } else if is_word_char(c) {
            advance_while(&mut chars, is_word_char);
            TokenKind::Word
        } else if "()[]{},;*".contains(c) {
            chars.next();
            TokenKind::Punctuation
        } else {
            chars.next();
            TokenKind::Other
        };

        let end = chars.peek().map(|&(idx, _)| idx).unwrap_or(line.len());
        let text = &line[start..end];
        let kind = if kind == TokenKind::Word && keywords.contains(&text.to_uppercase()) {
            TokenKind::Keyword
        } else {
            kind
        };
        tokens.push((kind, text));
    }

    tokens
}

fn advance_while(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    pred: impl Fn(char) -> bool,
) {
    while chars.next_if(|&(_, c)| pred(c)).is_some() {}
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn style_for(kind: TokenKind) -> Style {
    match kind {
        TokenKind::Keyword => Style::new().fg(Color::Rgb(0x00, 0x88, 0x00)).bold(),
        TokenKind::String => Style::new().fg(Color::Rgb(0xd7, 0x27, 0xff)),
        TokenKind::Comment => Style::new().fg(Color::Rgb(0x81, 0xdf, 0xff)).italic(),
        TokenKind::Number => Style::new().fg(Color::Purple),
        TokenKind::Punctuation => Style::new().fg(Color::Blue),
        TokenKind::Word | TokenKind::Whitespace | TokenKind::Other => Style::new(),
    }
}

/// Colors keywords of the active vocabulary, including dictionary
/// alternatives.
pub(crate) struct SQLHighlighter {
    keywords: HashSet<String>,
}

impl SQLHighlighter {
    pub(crate) fn new(vocabulary: &[String]) -> Self {
        SQLHighlighter {
            keywords: vocabulary.iter().map(|w| w.to_uppercase()).collect(),
        }
    }
}

impl Highlighter for SQLHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled_text = StyledText::new();
        for (kind, text) in tokenize(line, &self.keywords) {
            styled_text.push((style_for(kind), text.to_string()));
        }
        styled_text
    }
}

pub(crate) struct KeywordCompleter {
    vocabulary: Vec<String>,
}

impl KeywordCompleter {
    pub(crate) fn new(vocabulary: Vec<String>) -> Self {
        KeywordCompleter { vocabulary }
    }
}

/// Returns the byte offset where the word ending at `pos` starts.
fn word_start(line: &str, pos: usize) -> usize {
    line[..pos]
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_word_char(c))
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(pos)
}

/// Keywords matching the typed prefix. A lower-case prefix completes to the
/// lower-case keyword.
fn candidates(vocabulary: &[String], prefix: &str) -> Vec<String> {
    vocabulary
        .iter()
        .filter_map(|word| {
            if word.starts_with(prefix) {
                Some(word.clone())
            } else {
                let lower = word.to_lowercase();
                lower.starts_with(prefix).then_some(lower)
            }
        })
        .collect()
}

impl Completer for KeywordCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let start = word_start(line, pos);
        let prefix = &line[start..pos];
        if prefix.is_empty() {
            return Vec::new();
        }

        candidates(&self.vocabulary, prefix)
            .into_iter()
            .map(|value| Suggestion {
                value,
                span: Span::new(start, pos),
                append_whitespace: true,
                ..Default::default()
            })
            .collect()
    }
}
