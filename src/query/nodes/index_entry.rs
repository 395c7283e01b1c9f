//! Positional phrase leaf resolved against an inverted index

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::trace;

use crate::error::{QueryError, Result};
use crate::index::InvertedIndex;

use super::entry::strip_quotes;

/// Leaf query node resolved against a positional inverted index
///
/// A single token matches every document holding at least one posting for it.
/// A multi-token phrase requires the tokens at strictly consecutive
/// positions, in order, within one document.
#[derive(Clone, Debug)]
pub struct IndexEntry {
    tokens: Vec<String>,
}

impl IndexEntry {
    /// Build an index entry from a normalized term
    pub fn new(term: &str) -> Result<Self> {
        if term == "*" {
            return Err(QueryError::UnsupportedConstruct(
                "single-character wildcard terms are not supported".to_string(),
            ));
        }
        let tokens: Vec<String> = strip_quotes(term)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if tokens.is_empty() {
            return Err(QueryError::MalformedQuery("empty index term".to_string()));
        }
        Ok(Self { tokens })
    }

    /// Tokens of the phrase, in query order
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Resolve to the set of documents containing the phrase
    pub fn resolve(&self, index: &dyn InvertedIndex) -> HashSet<u64> {
        if self.tokens.len() == 1 {
            return index
                .lookup(&self.tokens[0])
                .iter()
                .map(|posting| posting.doc_id)
                .collect();
        }
        self.resolve_phrase(index)
    }

    fn resolve_phrase(&self, index: &dyn InvertedIndex) -> HashSet<u64> {
        let mut by_doc: HashMap<u64, Vec<(u32, &str)>> = HashMap::new();
        for token in &self.tokens {
            for posting in index.lookup(token) {
                by_doc
                    .entry(posting.doc_id)
                    .or_default()
                    .push((posting.position, token));
            }
        }

        let first = self.tokens[0].as_str();
        let rest = &self.tokens[1..];
        let mut results = HashSet::new();

        for (doc_id, mut pairs) in by_doc {
            if pairs.len() < self.tokens.len() {
                continue;
            }
            pairs.sort_unstable();

            // One hit per document is enough; disjoint occurrences are not
            // reported separately.
            'starts: for i in 0..=(pairs.len() - self.tokens.len()) {
                let (pos, token) = pairs[i];
                if token != first {
                    continue;
                }
                for (offset, expected) in rest.iter().enumerate() {
                    let (next_pos, next_token) = pairs[i + offset + 1];
                    if next_token != expected.as_str() || next_pos != pos + offset as u32 + 1 {
                        continue 'starts;
                    }
                }
                results.insert(doc_id);
                break;
            }
        }

        trace!(phrase = %self, matches = results.len(), "resolved phrase");
        results
    }
}

impl fmt::Display for IndexEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.tokens.join(" "))
    }
}
