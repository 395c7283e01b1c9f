use thiserror::Error;

/// Main error type for query compilation
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    #[error("Unsupported construct: {0}")]
    UnsupportedConstruct(String),

    #[error("Invalid wildcard pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for query operations
pub type Result<T> = std::result::Result<T, QueryError>;

impl QueryError {
    /// Check if this error was raised while analysing query structure
    /// (as opposed to rejecting an individual term)
    pub fn is_parse_error(&self) -> bool {
        matches!(self, QueryError::MalformedQuery(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryError::MalformedQuery("unbalanced brackets".to_string());
        assert_eq!(err.to_string(), "Malformed query: unbalanced brackets");

        let err = QueryError::UnsupportedConstruct("lone wildcard".to_string());
        assert_eq!(err.to_string(), "Unsupported construct: lone wildcard");
    }

    #[test]
    fn test_parse_error_classification() {
        assert!(QueryError::MalformedQuery("x".to_string()).is_parse_error());
        assert!(!QueryError::UnsupportedConstruct("x".to_string()).is_parse_error());
        assert!(!QueryError::InvalidPattern("x".to_string()).is_parse_error());
    }
}
