//! End-to-end tests for query compilation and evaluation
//!
//! Exercises the full pipeline: parsing, normalization, boolean and
//! span-collecting evaluation, and phrase resolution against an index.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use matchbook::{IndexQuery, MemoryIndex, Query, QueryConfig, QueryError, SearchQuery, Span};

fn documents() -> Vec<&'static str> {
    vec![
        "Gandalf is a fictional character in Tolkien's The Lord of the Rings",
        "Frodo is the main character in The Lord of the Rings",
        "Ian McKellen interpreted Gandalf in Peter Jackson's movies",
        "Elijah Wood was cast as Frodo Baggins in Jackson's adaptation",
        "The Lord of the Rings is an epic fantasy novel by J. R. R. Tolkien",
    ]
}

#[test]
fn boolean_query_with_wildcards_and_negation() {
    let query = Query::new(
        "((\"gandalf is a\" OR \"frodo\") OR (\"gandalf * movies\")) AND NOT (\"Tolkien\")",
        QueryConfig::default(),
    )
    .unwrap();

    let docs = documents();
    let expected = [false, true, true, true, false];
    for (doc, want) in docs.iter().zip(expected) {
        assert_eq!(query.matches(doc), want, "doc: {doc}");
    }
}

#[test]
fn boolean_and_not_is_false_when_left_is_false() {
    let query = Query::new(
        "(\"gandalf\" OR \"frodo\") AND NOT (\"tolkien\")",
        QueryConfig::default(),
    )
    .unwrap();

    assert!(query.matches("Frodo is the main character in The Lord of the Rings"));
    // Contains neither gandalf nor frodo; the false left operand decides
    assert!(!query.matches("An epic fantasy novel by J.R.R. Tolkien"));
}

#[test]
fn search_query_collects_spans() {
    let query = SearchQuery::new(
        "(\"gandalf is a\" OR \"frodo\") OR (\"gan*lf in\")",
        QueryConfig::default(),
    )
    .unwrap();

    let docs = documents();
    assert_eq!(query.find(docs[0]), vec![Span::new(0, 12, "gandalf is a")]);
    assert_eq!(query.find(docs[1]), vec![Span::new(0, 5, "frodo")]);
    assert_eq!(query.find(docs[2]), vec![Span::new(25, 35, "gandalf in")]);
    assert_eq!(query.find(docs[3]), vec![Span::new(24, 29, "frodo")]);
    assert!(query.find(docs[4]).is_empty());
}

#[test]
fn if_gates_spans_on_supporting_context() {
    let query = SearchQuery::new(
        "((\"gandalf is a\" OR \"frodo\") OR \"gan*lf in\") IF (\"lord\" AND \"rings\")",
        QueryConfig::default(),
    )
    .unwrap();

    let docs = documents();
    // Condition holds: spans pass through unchanged
    assert_eq!(query.find(docs[0]), vec![Span::new(0, 12, "gandalf is a")]);
    assert_eq!(query.find(docs[1]), vec![Span::new(0, 5, "frodo")]);
    // Condition fails: no spans even though the then-branch matches
    assert!(query.find(docs[2]).is_empty());
    assert!(query.find(docs[3]).is_empty());
    // Condition holds but the then-branch finds nothing
    assert!(query.find(docs[4]).is_empty());
}

#[test]
fn index_query_resolves_phrases() {
    let mut index = MemoryIndex::new();
    for (doc_id, doc) in documents().iter().enumerate() {
        index.add_document(doc_id as u64, doc);
    }

    let query = IndexQuery::new("\"lord of the rings\"", QueryConfig::default()).unwrap();
    assert_eq!(query.resolve(&index), HashSet::from([0, 1, 4]));

    let query = IndexQuery::new(
        "\"lord of the rings\" AND NOT \"frodo\"",
        QueryConfig::default(),
    )
    .unwrap();
    assert_eq!(query.resolve(&index), HashSet::from([0, 4]));

    let query = IndexQuery::new("\"gandalf\" OR \"elijah wood\"", QueryConfig::default()).unwrap();
    assert_eq!(query.resolve(&index), HashSet::from([0, 2, 3]));
}

#[test]
fn co_occurrence_without_adjacency_does_not_resolve() {
    let mut index = MemoryIndex::new();
    index.add_document(1, "the lord owns many rings");

    let query = IndexQuery::new("\"lord rings\"", QueryConfig::default()).unwrap();
    assert!(query.resolve(&index).is_empty());

    let query = IndexQuery::new("\"lord\" AND \"rings\"", QueryConfig::default()).unwrap();
    assert_eq!(query.resolve(&index), HashSet::from([1]));
}

#[test]
fn malformed_queries_fail_before_evaluation() {
    let unbalanced = Query::new("(\"a\" AND \"b\"", QueryConfig::default());
    assert!(matches!(unbalanced, Err(QueryError::MalformedQuery(_))));

    let dangling_quote = Query::new("\"a\" AND \"b", QueryConfig::default());
    assert!(matches!(dangling_quote, Err(QueryError::MalformedQuery(_))));

    let double_if = SearchQuery::new("\"a\" IF \"b\" IF \"c\"", QueryConfig::default());
    assert!(matches!(double_if, Err(QueryError::MalformedQuery(_))));
}

#[test]
fn rendered_query_reparses_to_equivalent_tree() {
    let config = QueryConfig::default();
    let original = Query::new(
        "((\"gandalf\" OR \"frodo\") AND NOT (\"tolkien\")) OR not \"ring\"",
        config.clone(),
    )
    .unwrap();
    let reparsed = Query::new(&original.to_string(), config).unwrap();

    for doc in documents() {
        assert_eq!(original.matches(doc), reparsed.matches(doc), "doc: {doc}");
    }
}

#[test]
fn compiled_query_is_shareable_across_threads() {
    let query = Arc::new(
        Query::new("\"frodo\" OR \"gandalf\"", QueryConfig::default()).unwrap(),
    );

    let handles: Vec<_> = documents()
        .into_iter()
        .map(|doc| {
            let query = Arc::clone(&query);
            thread::spawn(move || query.matches(doc))
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![true, true, true, true, false]);
}
