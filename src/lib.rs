pub mod config;
pub mod error;
pub mod index;
pub mod normalize;
pub mod query;
pub mod span;

pub use config::QueryConfig;
pub use error::{QueryError, Result};
pub use index::{InvertedIndex, MemoryIndex, PositionedTerm};
pub use normalize::{Lemmatizer, Normalizer};
pub use query::{IndexQuery, Query, QueryParser, SearchQuery};
pub use span::Span;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
