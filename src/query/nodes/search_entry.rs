//! Span-collecting leaf node

use std::fmt;

use regex::Regex;

use crate::error::Result;
use crate::query::pattern;
use crate::span::Span;

use super::entry::{strip_not, strip_quotes};

/// Leaf query node returning matched spans instead of a boolean
///
/// Negation has no meaning when collecting spans; a leading `not ` is
/// stripped for symmetry with boolean entries but otherwise ignored.
#[derive(Clone, Debug)]
pub struct SearchEntry {
    literal: String,
    pattern: Option<Regex>,
}

impl SearchEntry {
    /// Build a search entry from a normalized term
    pub fn new(term: &str) -> Result<Self> {
        let (_, term) = strip_not(term);
        let literal = strip_quotes(term).to_string();
        let pattern = pattern::compile(&literal)?;
        Ok(Self { literal, pattern })
    }

    /// The unquoted literal this entry matches
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Collect all non-overlapping occurrences in left-to-right order
    pub fn find_spans(&self, doc: &str) -> Vec<Span> {
        match &self.pattern {
            Some(rgx) => rgx
                .find_iter(doc)
                .map(|m| Span::new(m.start(), m.end(), m.as_str()))
                .collect(),
            None => find_all(doc, &self.literal),
        }
    }
}

impl fmt::Display for SearchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.literal)
    }
}

/// Forward scan that advances past each hit, never yielding overlapping
/// occurrences of the same literal
fn find_all(doc: &str, literal: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    if literal.is_empty() {
        return spans;
    }
    let mut from = 0;
    while let Some(found) = doc[from..].find(literal) {
        let start = from + found;
        let end = start + literal.len();
        spans.push(Span::new(start, end, literal));
        from = end;
    }
    spans
}
