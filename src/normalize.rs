//! Text normalization applied to query literals and documents
//!
//! Normalization is configured once per query and applied identically on both
//! sides of a match. Lemmatization is an injected capability: the core has no
//! knowledge of the linguistic backend, and running without one is a valid
//! configuration as long as `lemmatize` is disabled.

use std::fmt;
use std::sync::Arc;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::QueryConfig;
use crate::error::{QueryError, Result};

/// Lemmatization backend injected by the caller
pub trait Lemmatizer: Send + Sync {
    /// Whether this backend can lemmatize the given language tag
    fn supports(&self, language: &str) -> bool;

    /// Return the lemma of a single token
    fn lemma(&self, token: &str) -> String;
}

/// Applies the configured normalization pipeline
#[derive(Clone)]
pub struct Normalizer {
    config: QueryConfig,
    lemmatizer: Option<Arc<dyn Lemmatizer>>,
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("config", &self.config)
            .field("has_lemmatizer", &self.lemmatizer.is_some())
            .finish()
    }
}

impl Normalizer {
    /// Create a normalizer without a lemmatization backend
    pub fn new(config: QueryConfig) -> Result<Self> {
        Self::with_lemmatizer(config, None)
    }

    /// Create a normalizer, optionally attaching a lemmatization backend
    ///
    /// Fails when `lemmatize` is enabled but no backend is present, or the
    /// backend does not support the configured language.
    pub fn with_lemmatizer(
        config: QueryConfig,
        lemmatizer: Option<Arc<dyn Lemmatizer>>,
    ) -> Result<Self> {
        if config.lemmatize {
            match &lemmatizer {
                None => {
                    return Err(QueryError::UnsupportedConstruct(
                        "lemmatization enabled without a lemmatizer backend".to_string(),
                    ))
                }
                Some(backend) if !backend.supports(&config.language) => {
                    return Err(QueryError::UnsupportedConstruct(format!(
                        "language {:?} not supported by the lemmatizer backend",
                        config.language
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(Self { config, lemmatizer })
    }

    /// Configuration this normalizer was built with
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Normalize a raw document or query literal
    ///
    /// Tokens carrying a wildcard marker pass through lemmatization verbatim,
    /// so patterns written into the query survive the rewrite.
    pub fn normalize(&self, text: &str) -> String {
        let mut out = if self.config.fold_case {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        if self.config.strip_accents {
            out = out.nfd().filter(|c| !is_combining_mark(*c)).collect();
        }

        if self.config.lemmatize {
            if let Some(backend) = &self.lemmatizer {
                out = out
                    .split_whitespace()
                    .map(|token| {
                        if token.contains('*') {
                            token.to_string()
                        } else {
                            backend.lemma(token)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
            }
        }

        out
    }
}
