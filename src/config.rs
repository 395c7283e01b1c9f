use serde::{Deserialize, Serialize};

/// Normalization configuration shared by query parsing and document evaluation
///
/// The parser applies this configuration to every query literal, and compiled
/// queries apply it again to every document before evaluation. Both sides must
/// use the identical configuration or matches will silently fail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Lowercase literals and documents
    pub fold_case: bool,
    /// Strip diacritics (`café` matches `cafe`)
    pub strip_accents: bool,
    /// Replace tokens by their lemma via the injected backend
    pub lemmatize: bool,
    /// Language tag handed to the lemmatizer backend
    pub language: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            fold_case: true,
            strip_accents: true,
            lemmatize: false,
            language: "en".to_string(),
        }
    }
}
