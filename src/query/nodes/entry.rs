//! Boolean leaf node

use std::fmt;

use regex::Regex;

use crate::error::Result;
use crate::query::pattern;

/// Leaf query node matching literal text or a wildcard pattern, boolean result
///
/// Built from an already-normalized term. A leading `not ` on the term sets
/// the negation flag and inverts the result.
#[derive(Clone, Debug)]
pub struct Entry {
    literal: String,
    negated: bool,
    pattern: Option<Regex>,
}

impl Entry {
    /// Build an entry from a normalized term, which may still carry its
    /// surrounding quotes and a leading `not `
    pub fn new(term: &str) -> Result<Self> {
        let (negated, term) = strip_not(term);
        let literal = strip_quotes(term).to_string();
        let pattern = pattern::compile(&literal)?;
        Ok(Self {
            literal,
            negated,
            pattern,
        })
    }

    /// The unquoted literal this entry matches
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Whether the result is inverted
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Evaluate against a normalized document
    pub fn matches(&self, doc: &str) -> bool {
        let hit = match &self.pattern {
            Some(rgx) => rgx.is_match(doc),
            None => doc.contains(&self.literal),
        };
        if self.negated {
            !hit
        } else {
            hit
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "not \"{}\"", self.literal)
        } else {
            write!(f, "\"{}\"", self.literal)
        }
    }
}

/// Split a leading `not ` keyword off a raw term
pub(crate) fn strip_not(term: &str) -> (bool, &str) {
    match term.strip_prefix("not ") {
        Some(rest) => (true, rest),
        None => (false, term),
    }
}

/// Remove one layer of enclosing quotes
pub(crate) fn strip_quotes(term: &str) -> &str {
    if term.len() >= 2 && term.starts_with('"') && term.ends_with('"') {
        &term[1..term.len() - 1]
    } else {
        term
    }
}
