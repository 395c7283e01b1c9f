//! Expression tree node types and evaluation
//!
//! Nodes are tagged enums rather than trait objects: each evaluation mode has
//! its own tree type, so evaluating a span-collecting tree for a boolean
//! result is unrepresentable. Trees own their children exclusively, are built
//! bottom-up by the parser, and are never mutated afterwards — a built tree
//! is `Send + Sync` and can be evaluated concurrently against different
//! documents without locking.

use std::collections::HashSet;
use std::fmt;

use crate::index::InvertedIndex;
use crate::span::Span;

use super::nodes::{Entry, IndexEntry, SearchEntry};

/// Boolean-mode expression tree
#[derive(Clone, Debug)]
pub enum MatchNode {
    /// Literal or wildcard leaf
    Leaf(Entry),
    /// Both sides must match
    And(Box<MatchNode>, Box<MatchNode>),
    /// Either side matches
    Or(Box<MatchNode>, Box<MatchNode>),
    /// Left matches and right does not
    AndNot(Box<MatchNode>, Box<MatchNode>),
}

impl MatchNode {
    /// Evaluate against a normalized document
    pub fn matches(&self, doc: &str) -> bool {
        match self {
            MatchNode::Leaf(entry) => entry.matches(doc),
            MatchNode::And(left, right) => left.matches(doc) && right.matches(doc),
            MatchNode::Or(left, right) => left.matches(doc) || right.matches(doc),
            MatchNode::AndNot(left, right) => left.matches(doc) && !right.matches(doc),
        }
    }
}

impl fmt::Display for MatchNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchNode::Leaf(entry) => entry.fmt(f),
            MatchNode::And(left, right) => write!(f, "({left}) AND ({right})"),
            MatchNode::Or(left, right) => write!(f, "({left}) OR ({right})"),
            MatchNode::AndNot(left, right) => write!(f, "({left}) AND NOT ({right})"),
        }
    }
}

/// Search-mode (span-collecting) expression tree
#[derive(Clone, Debug)]
pub enum SearchNode {
    /// Literal or wildcard leaf
    Leaf(SearchEntry),
    /// Concatenation of both sides' spans, left first
    Or(Box<SearchNode>, Box<SearchNode>),
    /// Spans of `then`, gated on a boolean condition
    ///
    /// The condition requires supporting context without that context itself
    /// appearing as a match.
    If {
        then: Box<SearchNode>,
        cond: Box<MatchNode>,
    },
}

impl SearchNode {
    /// Collect matched spans from a normalized document
    ///
    /// Spans contributed by both branches of an `Or` are kept as-is: no
    /// de-duplication and no merging of overlapping regions.
    pub fn find_spans(&self, doc: &str) -> Vec<Span> {
        match self {
            SearchNode::Leaf(entry) => entry.find_spans(doc),
            SearchNode::Or(left, right) => {
                let mut spans = left.find_spans(doc);
                spans.extend(right.find_spans(doc));
                spans
            }
            SearchNode::If { then, cond } => {
                if cond.matches(doc) {
                    then.find_spans(doc)
                } else {
                    Vec::new()
                }
            }
        }
    }
}

impl fmt::Display for SearchNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchNode::Leaf(entry) => entry.fmt(f),
            SearchNode::Or(left, right) => write!(f, "({left}) OR ({right})"),
            SearchNode::If { then, cond } => write!(f, "({then}) IF ({cond})"),
        }
    }
}

/// Index-mode expression tree, evaluated over document-id sets
#[derive(Clone, Debug)]
pub enum IndexNode {
    /// Single- or multi-token phrase leaf
    Leaf(IndexEntry),
    /// Intersection
    And(Box<IndexNode>, Box<IndexNode>),
    /// Union
    Or(Box<IndexNode>, Box<IndexNode>),
    /// Difference
    AndNot(Box<IndexNode>, Box<IndexNode>),
}

impl IndexNode {
    /// Resolve to the set of matching document identifiers
    pub fn resolve(&self, index: &dyn InvertedIndex) -> HashSet<u64> {
        match self {
            IndexNode::Leaf(entry) => entry.resolve(index),
            IndexNode::And(left, right) => &left.resolve(index) & &right.resolve(index),
            IndexNode::Or(left, right) => &left.resolve(index) | &right.resolve(index),
            IndexNode::AndNot(left, right) => &left.resolve(index) - &right.resolve(index),
        }
    }
}

impl fmt::Display for IndexNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexNode::Leaf(entry) => entry.fmt(f),
            IndexNode::And(left, right) => write!(f, "({left}) AND ({right})"),
            IndexNode::Or(left, right) => write!(f, "({left}) OR ({right})"),
            IndexNode::AndNot(left, right) => write!(f, "({left}) AND NOT ({right})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;

    fn leaf(term: &str) -> Box<MatchNode> {
        Box::new(MatchNode::Leaf(Entry::new(term).unwrap()))
    }

    fn search_leaf(term: &str) -> Box<SearchNode> {
        Box::new(SearchNode::Leaf(SearchEntry::new(term).unwrap()))
    }

    #[test]
    fn test_and_or_andnot_semantics() {
        let doc = "frodo and sam walk to mordor";

        assert!(MatchNode::And(leaf("frodo"), leaf("sam")).matches(doc));
        assert!(!MatchNode::And(leaf("frodo"), leaf("gandalf")).matches(doc));

        assert!(MatchNode::Or(leaf("gandalf"), leaf("sam")).matches(doc));
        assert!(!MatchNode::Or(leaf("gandalf"), leaf("merry")).matches(doc));

        assert!(MatchNode::AndNot(leaf("frodo"), leaf("gandalf")).matches(doc));
        assert!(!MatchNode::AndNot(leaf("frodo"), leaf("sam")).matches(doc));
        // false left operand is false regardless of right
        assert!(!MatchNode::AndNot(leaf("gandalf"), leaf("sam")).matches(doc));
    }

    #[test]
    fn test_search_or_concatenates_without_dedup() {
        let doc = "frodo baggins";
        // Both branches match the same region; duplication is preserved
        let node = SearchNode::Or(search_leaf("frodo"), search_leaf("frodo"));
        let spans = node.find_spans(doc);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0], spans[1]);
    }

    #[test]
    fn test_search_or_keeps_branch_order() {
        let doc = "sam saw frodo";
        let node = SearchNode::Or(search_leaf("frodo"), search_leaf("sam"));
        let spans = node.find_spans(doc);
        assert_eq!(spans[0].text, "frodo");
        assert_eq!(spans[1].text, "sam");
    }

    #[test]
    fn test_if_gates_spans() {
        let doc = "frodo carries the ring";
        let gated = SearchNode::If {
            then: search_leaf("frodo"),
            cond: leaf("ring"),
        };
        assert_eq!(gated.find_spans(doc).len(), 1);

        let blocked = SearchNode::If {
            then: search_leaf("frodo"),
            cond: leaf("sauron"),
        };
        assert!(blocked.find_spans(doc).is_empty());
    }

    #[test]
    fn test_index_set_operations() {
        let mut index = MemoryIndex::new();
        index.add_document(1, "lord of the rings");
        index.add_document(2, "lord of the flies");
        index.add_document(3, "rings of power");

        let lord = Box::new(IndexNode::Leaf(IndexEntry::new("lord").unwrap()));
        let rings = Box::new(IndexNode::Leaf(IndexEntry::new("rings").unwrap()));

        assert_eq!(
            IndexNode::And(lord.clone(), rings.clone()).resolve(&index),
            HashSet::from([1])
        );
        assert_eq!(
            IndexNode::Or(lord.clone(), rings.clone()).resolve(&index),
            HashSet::from([1, 2, 3])
        );
        assert_eq!(
            IndexNode::AndNot(lord, rings).resolve(&index),
            HashSet::from([2])
        );
    }

    #[test]
    fn test_display_nests_brackets() {
        let node = MatchNode::AndNot(
            Box::new(MatchNode::Or(leaf("gandalf"), leaf("frodo"))),
            leaf("tolkien"),
        );
        assert_eq!(
            node.to_string(),
            "((\"gandalf\") OR (\"frodo\")) AND NOT (\"tolkien\")"
        );
    }

    #[test]
    fn test_trees_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MatchNode>();
        assert_send_sync::<SearchNode>();
        assert_send_sync::<IndexNode>();
    }
}
