//! Recursive query parser
//!
//! # Grammar
//!
//! ```text
//! query   := literal
//!          | '(' query ')'
//!          | 'not ' query
//!          | query ' AND ' query
//!          | query ' OR ' query
//!          | query ' AND NOT ' query
//! search  := literal | '(' search ')' | search ' OR ' search | search ' IF ' query
//! literal := '"' text '"'            (text may embed the wildcard marker '*')
//! ```
//!
//! Operator keywords are case-insensitive and must be surrounded by spaces.
//! Operators carry no fixed precedence by type: the split point is the first
//! (leftmost) occurrence whose left substring is balanced — equal parenthesis
//! counts and an even quote count — so grouping follows bracket and quote
//! placement, not operator kind. The same keyword can bind differently under
//! different bracketing.
//!
//! Parsing recurses over index ranges of the original query string; substrings
//! are never copied until a leaf literal is normalized.

use std::sync::Arc;

use regex::Regex;
use tracing::trace;

use crate::config::QueryConfig;
use crate::error::{QueryError, Result};
use crate::normalize::{Lemmatizer, Normalizer};

use super::ast::{IndexNode, MatchNode, SearchNode};
use super::nodes::{Entry, IndexEntry, SearchEntry};

/// Operator keywords recognized between subqueries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operator {
    And,
    Or,
    AndNot,
    If,
}

impl Operator {
    fn from_keyword(keyword: &str) -> Result<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "and" => Ok(Operator::And),
            "or" => Ok(Operator::Or),
            "and not" => Ok(Operator::AndNot),
            "if" => Ok(Operator::If),
            other => Err(QueryError::MalformedQuery(format!(
                "unknown operator {other:?}"
            ))),
        }
    }
}

/// Parser turning query strings into executable expression trees
///
/// One parser instance can compile any number of queries; the expression
/// trees it returns are immutable and reusable across documents.
pub struct QueryParser {
    normalizer: Normalizer,
    boolean_ops: Regex,
    search_ops: Regex,
}

impl QueryParser {
    /// Create a parser without a lemmatization backend
    pub fn new(config: QueryConfig) -> Result<Self> {
        Self::with_lemmatizer(config, None)
    }

    /// Create a parser, optionally attaching a lemmatization backend
    pub fn with_lemmatizer(
        config: QueryConfig,
        lemmatizer: Option<Arc<dyn Lemmatizer>>,
    ) -> Result<Self> {
        Ok(Self {
            normalizer: Normalizer::with_lemmatizer(config, lemmatizer)?,
            // Alternation order matters: AND NOT must win over AND at the
            // same offset.
            boolean_ops: Regex::new(r"(?i) (AND NOT|AND|OR) ").expect("hardcoded pattern"),
            search_ops: Regex::new(r"(?i) (OR|IF) ").expect("hardcoded pattern"),
        })
    }

    /// Normalizer this parser applies to query literals
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Parse in boolean mode (operators AND, OR, AND NOT)
    pub fn parse(&self, query: &str) -> Result<MatchNode> {
        self.parse_boolean(query)
    }

    /// Parse in search mode (operators OR and at most one IF per scan)
    ///
    /// The right-hand side of IF is a gating condition and is always parsed
    /// in boolean mode.
    pub fn parse_search(&self, query: &str) -> Result<SearchNode> {
        let query = check_not_empty(strip_outer_brackets(query))?;
        if let Some(literal) = quoted_literal(query) {
            return Ok(SearchNode::Leaf(SearchEntry::new(
                &self.normalizer.normalize(literal),
            )?));
        }
        match self.split_at_operator(query, &self.search_ops)? {
            Some((left, Operator::Or, right)) => Ok(SearchNode::Or(
                Box::new(self.parse_search(left)?),
                Box::new(self.parse_search(right)?),
            )),
            Some((left, Operator::If, right)) => Ok(SearchNode::If {
                then: Box::new(self.parse_search(left)?),
                cond: Box::new(self.parse_boolean(right)?),
            }),
            Some((_, operator, _)) => Err(QueryError::MalformedQuery(format!(
                "operator {operator:?} is not valid in a search query"
            ))),
            None => Ok(SearchNode::Leaf(SearchEntry::new(
                &self.normalizer.normalize(query),
            )?)),
        }
    }

    /// Parse in index mode (operators AND, OR, AND NOT over phrase leaves)
    pub fn parse_index(&self, query: &str) -> Result<IndexNode> {
        let query = check_not_empty(strip_outer_brackets(query))?;
        if let Some(literal) = quoted_literal(query) {
            return Ok(IndexNode::Leaf(IndexEntry::new(
                &self.normalizer.normalize(literal),
            )?));
        }
        match self.split_at_operator(query, &self.boolean_ops)? {
            Some((left, operator, right)) => {
                let lhs = Box::new(self.parse_index(left)?);
                let rhs = Box::new(self.parse_index(right)?);
                Ok(match operator {
                    Operator::And => IndexNode::And(lhs, rhs),
                    Operator::Or => IndexNode::Or(lhs, rhs),
                    Operator::AndNot => IndexNode::AndNot(lhs, rhs),
                    Operator::If => {
                        return Err(QueryError::MalformedQuery(
                            "IF is not valid in an index query".to_string(),
                        ))
                    }
                })
            }
            None => Ok(IndexNode::Leaf(IndexEntry::new(
                &self.normalizer.normalize(query),
            )?)),
        }
    }

    fn parse_boolean(&self, query: &str) -> Result<MatchNode> {
        let query = check_not_empty(strip_outer_brackets(query))?;
        if let Some(literal) = quoted_literal(query) {
            return Ok(MatchNode::Leaf(Entry::new(
                &self.normalizer.normalize(literal),
            )?));
        }
        match self.split_at_operator(query, &self.boolean_ops)? {
            Some((left, operator, right)) => {
                let lhs = Box::new(self.parse_boolean(left)?);
                let rhs = Box::new(self.parse_boolean(right)?);
                Ok(match operator {
                    Operator::And => MatchNode::And(lhs, rhs),
                    Operator::Or => MatchNode::Or(lhs, rhs),
                    Operator::AndNot => MatchNode::AndNot(lhs, rhs),
                    Operator::If => {
                        return Err(QueryError::MalformedQuery(
                            "IF is only valid in search queries".to_string(),
                        ))
                    }
                })
            }
            None => Ok(MatchNode::Leaf(Entry::new(
                &self.normalizer.normalize(query),
            )?)),
        }
    }

    /// Find the leftmost operator occurrence whose left substring is balanced
    ///
    /// Returns `None` when the scanned substring contains no operator at all.
    /// Fails when operators exist but none admits a balanced split, when the
    /// chosen split leaves an unbalanced right substring, or when the scan
    /// sees more than one IF.
    fn split_at_operator<'a>(
        &self,
        query: &'a str,
        ops: &Regex,
    ) -> Result<Option<(&'a str, Operator, &'a str)>> {
        let mut if_count = 0usize;
        let mut occurrences = Vec::new();
        for found in ops.find_iter(query) {
            // The match includes the surrounding spaces
            let keyword = &query[found.start() + 1..found.end() - 1];
            let operator = Operator::from_keyword(keyword)?;
            if operator == Operator::If {
                if_count += 1;
                if if_count >= 2 {
                    return Err(QueryError::MalformedQuery(
                        "query contains multiple IF".to_string(),
                    ));
                }
            }
            occurrences.push((operator, found.start(), found.end()));
        }

        if occurrences.is_empty() {
            return Ok(None);
        }

        for (operator, start, end) in occurrences {
            let left = &query[..start];
            if !is_balanced(left) {
                continue;
            }
            let right = &query[end..];
            if !is_balanced(right) {
                return Err(QueryError::MalformedQuery(format!(
                    "unbalanced operand after {:?}",
                    query[start..end].trim()
                )));
            }
            trace!(operator = ?operator, split = start, "balanced split");
            return Ok(Some((left, operator, right)));
        }

        Err(QueryError::MalformedQuery(format!(
            "no balanced operator split in {query:?}"
        )))
    }
}

fn check_not_empty(query: &str) -> Result<&str> {
    if query.trim().is_empty() {
        return Err(QueryError::MalformedQuery("empty query".to_string()));
    }
    Ok(query)
}

/// Strip one layer of brackets when they enclose the entire query
///
/// A balance scan guards against stripping brackets that only wrap a prefix,
/// as in `(a) AND (b)`.
fn strip_outer_brackets(query: &str) -> &str {
    let bytes = query.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'(' || bytes[bytes.len() - 1] != b')' {
        return query;
    }
    let mut depth = 0i32;
    for (i, ch) in query.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth == 0 && i + ch.len_utf8() < query.len() {
            // Depth returned to zero before the end: the leading bracket does
            // not enclose the whole query.
            return query;
        }
    }
    &query[1..query.len() - 1]
}

/// Detect a query that is a single quoted literal: exactly two quote
/// characters, both at the boundary
fn quoted_literal(query: &str) -> Option<&str> {
    let bytes = query.as_bytes();
    if bytes.len() >= 2
        && bytes[0] == b'"'
        && bytes[bytes.len() - 1] == b'"'
        && query.matches('"').count() == 2
    {
        Some(query)
    } else {
        None
    }
}

/// Balanced substring: equal parenthesis counts and an even quote count
fn is_balanced(query: &str) -> bool {
    let mut open = 0usize;
    let mut close = 0usize;
    let mut quotes = 0usize;
    for ch in query.chars() {
        match ch {
            '(' => open += 1,
            ')' => close += 1,
            '"' => quotes += 1,
            _ => {}
        }
    }
    open == close && quotes % 2 == 0
}
