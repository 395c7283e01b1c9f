//! Wildcard literal compilation
//!
//! A `*` inside a quoted literal matches zero or more characters up to the
//! next sentence delimiter, so a single marker can cover several words but
//! never crosses punctuation. The rest of the literal is matched verbatim.

use regex::Regex;

use crate::error::{QueryError, Result};

/// Regex fragment substituted for each `*` marker: zero or more
/// non-delimiter characters
const WILDCARD_FRAGMENT: &str = r"[^.,;:!?]*";

/// Compile a literal into a substring-search pattern
///
/// Returns `None` when the literal contains no wildcard marker; such entries
/// compare by plain containment instead of pattern search.
pub fn compile(literal: &str) -> Result<Option<Regex>> {
    if !literal.contains('*') {
        return Ok(None);
    }

    let mut pattern = String::with_capacity(literal.len() + WILDCARD_FRAGMENT.len());
    for ch in literal.chars() {
        match ch {
            '*' => pattern.push_str(WILDCARD_FRAGMENT),
            // Escape regex special characters
            '.' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\' => {
                pattern.push('\\');
                pattern.push(ch);
            }
            _ => pattern.push(ch),
        }
    }

    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| QueryError::InvalidPattern(format!("{literal:?}: {e}")))
}
