//! Compiled, reusable query objects
//!
//! A compiled query pairs a parsed expression tree with the normalizer used
//! to build it, so every evaluated document goes through the identical
//! normalization the query literals did. Compiled queries are immutable and
//! `Send + Sync`; share one across threads and evaluate freely.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::config::QueryConfig;
use crate::error::Result;
use crate::index::InvertedIndex;
use crate::normalize::{Lemmatizer, Normalizer};
use crate::span::Span;

use super::ast::{IndexNode, MatchNode, SearchNode};
use super::parser::QueryParser;

/// Boolean-mode compiled query
pub struct Query {
    root: MatchNode,
    normalizer: Normalizer,
}

impl Query {
    /// Compile a boolean query string
    pub fn new(query: &str, config: QueryConfig) -> Result<Self> {
        Self::with_lemmatizer(query, config, None)
    }

    /// Compile with an optional lemmatization backend
    pub fn with_lemmatizer(
        query: &str,
        config: QueryConfig,
        lemmatizer: Option<Arc<dyn Lemmatizer>>,
    ) -> Result<Self> {
        let parser = QueryParser::with_lemmatizer(config, lemmatizer)?;
        Ok(Self {
            root: parser.parse(query)?,
            normalizer: parser.normalizer().clone(),
        })
    }

    /// The parsed expression tree
    pub fn root(&self) -> &MatchNode {
        &self.root
    }

    /// Whether a raw document matches the query
    pub fn matches(&self, document: &str) -> bool {
        self.root.matches(&self.normalizer.normalize(document))
    }

    /// Keep only the documents matching the query
    pub fn filter<'a, I>(&self, documents: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        documents
            .into_iter()
            .filter(|doc| self.matches(doc))
            .collect()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}

/// Search-mode compiled query, returning matched spans
pub struct SearchQuery {
    root: SearchNode,
    normalizer: Normalizer,
}

impl SearchQuery {
    /// Compile a search query string
    pub fn new(query: &str, config: QueryConfig) -> Result<Self> {
        Self::with_lemmatizer(query, config, None)
    }

    /// Compile with an optional lemmatization backend
    pub fn with_lemmatizer(
        query: &str,
        config: QueryConfig,
        lemmatizer: Option<Arc<dyn Lemmatizer>>,
    ) -> Result<Self> {
        let parser = QueryParser::with_lemmatizer(config, lemmatizer)?;
        Ok(Self {
            root: parser.parse_search(query)?,
            normalizer: parser.normalizer().clone(),
        })
    }

    /// The parsed expression tree
    pub fn root(&self) -> &SearchNode {
        &self.root
    }

    /// Collect matched spans from a raw document
    ///
    /// Offsets refer to the normalized form of the document.
    pub fn find(&self, document: &str) -> Vec<Span> {
        self.root.find_spans(&self.normalizer.normalize(document))
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}

/// Index-mode compiled query, resolved against a positional inverted index
pub struct IndexQuery {
    root: IndexNode,
}

impl IndexQuery {
    /// Compile an index query string
    pub fn new(query: &str, config: QueryConfig) -> Result<Self> {
        Self::with_lemmatizer(query, config, None)
    }

    /// Compile with an optional lemmatization backend
    pub fn with_lemmatizer(
        query: &str,
        config: QueryConfig,
        lemmatizer: Option<Arc<dyn Lemmatizer>>,
    ) -> Result<Self> {
        let parser = QueryParser::with_lemmatizer(config, lemmatizer)?;
        Ok(Self {
            root: parser.parse_index(query)?,
        })
    }

    /// The parsed expression tree
    pub fn root(&self) -> &IndexNode {
        &self.root
    }

    /// Resolve to the set of matching document identifiers
    pub fn resolve(&self, index: &dyn InvertedIndex) -> HashSet<u64> {
        self.root.resolve(index)
    }
}

impl fmt::Display for IndexQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}
