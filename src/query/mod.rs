//! Query compilation and execution
//!
//! A query string combines quoted literals (optionally carrying `*`
//! wildcards), brackets, a leading `not `, and the operators `AND`, `OR`,
//! `AND NOT` and `IF`. Parsing builds an immutable expression tree once; the
//! tree is then evaluated per document (boolean or span-collecting mode) or
//! resolved against a positional inverted index.
//!
//! # Example
//!
//! ```rust
//! use matchbook::{Query, QueryConfig};
//!
//! let query = Query::new(
//!     "(\"gandalf\" OR \"frodo\") AND NOT (\"tolkien\")",
//!     QueryConfig::default(),
//! )
//! .unwrap();
//! assert!(query.matches("Frodo is the main character in The Lord of the Rings"));
//! ```

pub mod ast;
pub mod compiled;
pub mod nodes;
pub mod parser;
pub mod pattern;

pub use ast::{IndexNode, MatchNode, SearchNode};
pub use compiled::{IndexQuery, Query, SearchQuery};
pub use nodes::{Entry, IndexEntry, SearchEntry};
pub use parser::QueryParser;
