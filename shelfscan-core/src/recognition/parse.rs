//! Splitting raw spine text into title and author

use crate::types::UNKNOWN_AUTHOR;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Which rule produced a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentPattern {
    /// `<title> - <author>` or `<title> – <author>`
    Dashed,
    /// `<title> by <author>`
    By,
    /// `<title> <author-token>`
    TrailingToken,
    /// Nothing matched; the whole fragment is the title
    Unparsed,
}

/// Title and author guessed from one fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedFragment {
    pub title: String,
    pub author: String,

    #[serde(skip)]
    pub pattern: FragmentPattern,
}

impl ParsedFragment {
    /// Whether the fragment named an author at all
    pub fn has_author(&self) -> bool {
        self.pattern != FragmentPattern::Unparsed
    }
}

fn dashed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+)\s+[-–]\s+(.+)$").expect("static pattern"))
}

fn by() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(.+)\s+by\s+(.+)$").expect("static pattern"))
}

fn trailing_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+)\s+(\S+)$").expect("static pattern"))
}

/// Split a fragment into title and author
///
/// Rules are tried most specific first and the first match wins. Titles
/// capture greedily, so the last separator in the fragment is the split.
pub fn parse_fragment(fragment: &str) -> ParsedFragment {
    let text = fragment.trim();

    let rules = [
        (dashed(), FragmentPattern::Dashed),
        (by(), FragmentPattern::By),
        (trailing_token(), FragmentPattern::TrailingToken),
    ];

    for (re, pattern) in rules {
        if let Some(caps) = re.captures(text) {
            let title = caps[1].trim();
            let author = caps[2].trim();
            if !title.is_empty() && !author.is_empty() {
                return ParsedFragment {
                    title: title.to_string(),
                    author: author.to_string(),
                    pattern,
                };
            }
        }
    }

    ParsedFragment {
        title: text.to_string(),
        author: UNKNOWN_AUTHOR.to_string(),
        pattern: FragmentPattern::Unparsed,
    }
}
