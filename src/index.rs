//! Positional inverted index interface
//!
//! The core never builds or persists an index itself; it only reads postings
//! through the [`InvertedIndex`] trait during phrase resolution. `MemoryIndex`
//! is the reference collaborator used in tests and small deployments.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// One occurrence of a token at a document and token position
///
/// Ordering is by `(doc_id, position)`, which phrase resolution relies on.
/// Uniqueness is not required: a token may occur repeatedly in one document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PositionedTerm {
    /// Identifier of the containing document
    pub doc_id: u64,
    /// Zero-based token position within the document
    pub position: u32,
}

impl PositionedTerm {
    /// Create a new positioned term
    pub fn new(doc_id: u64, position: u32) -> Self {
        Self { doc_id, position }
    }
}

/// Read-only source of positional postings
///
/// A token absent from the index yields empty postings rather than an error.
/// Implementations must return postings ordered by `(doc_id, position)`.
pub trait InvertedIndex {
    /// Fetch the postings for an exact token string
    fn lookup(&self, token: &str) -> &[PositionedTerm];
}

/// In-memory positional index
///
/// Tokenizes documents on Unicode word boundaries and lowercases tokens, so
/// it pairs with the default query configuration. Postings are kept in
/// `(doc_id, position)` order regardless of insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryIndex {
    postings: HashMap<String, Vec<PositionedTerm>>,
}

impl MemoryIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize `text` and record one posting per token occurrence
    pub fn add_document(&mut self, doc_id: u64, text: &str) {
        for (position, word) in text.unicode_words().enumerate() {
            self.insert(word.to_lowercase(), PositionedTerm::new(doc_id, position as u32));
        }
    }

    /// Record a single posting, preserving `(doc_id, position)` order
    pub fn insert(&mut self, token: impl Into<String>, term: PositionedTerm) {
        let list = self.postings.entry(token.into()).or_default();
        let at = list.partition_point(|existing| existing <= &term);
        list.insert(at, term);
    }

    /// Number of distinct tokens in the index
    pub fn token_count(&self) -> usize {
        self.postings.len()
    }
}

impl InvertedIndex for MemoryIndex {
    fn lookup(&self, token: &str) -> &[PositionedTerm] {
        self.postings.get(token).map(Vec::as_slice).unwrap_or(&[])
    }
}
