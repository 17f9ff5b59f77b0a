//! Placeholder Parser
//!
//! Scans template text for `{name}` markers. A doubled brace (`{{` or `}}`)
//! is an escape for a single literal brace and never opens or closes a
//! placeholder, so `{{name}}` renders as the literal text `{name}`.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Escaped braces first, then `{` + one or more non-brace chars + `}`.
/// Alternation is leftmost-first, so `{{` always wins over a placeholder start.
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{|\}\}|\{([^{}]+)\}").expect("placeholder pattern is a valid regex")
    })
}

/// A lexical piece of template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal text between markers
    Text(&'a str),
    /// `{{` or `}}`, standing for a single brace
    EscapedBrace(char),
    /// A `{name}` marker; `raw` includes the braces
    Placeholder { name: &'a str, raw: &'a str },
}

/// Split template text into literal text, escaped braces and placeholders.
///
/// Concatenating every token's source text reproduces the input exactly.
pub fn tokenize(content: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last_end = 0;

    for caps in token_pattern().captures_iter(content) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        if whole.start() > last_end {
            tokens.push(Token::Text(&content[last_end..whole.start()]));
        }
        match caps.get(1) {
            Some(name) => tokens.push(Token::Placeholder {
                name: name.as_str(),
                raw: whole.as_str(),
            }),
            None => {
                let brace = if whole.as_str() == "{{" { '{' } else { '}' };
                tokens.push(Token::EscapedBrace(brace));
            }
        }
        last_end = whole.end();
    }

    if last_end < content.len() {
        tokens.push(Token::Text(&content[last_end..]));
    }
    tokens
}

/// Extract placeholder names in order of first appearance, without duplicates.
pub fn parse_placeholders(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(content)
        .into_iter()
        .filter_map(|token| match token {
            Token::Placeholder { name, .. } => Some(name),
            _ => None,
        })
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}
