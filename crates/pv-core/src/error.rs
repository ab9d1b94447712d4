//! Error types for ProbViz

use thiserror::Error;

/// ProbViz error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error (unknown family tag, wrong handle kind)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Structural precondition violated by the caller (e.g. a non-2x2 covariance).
    #[error("Shape error: {0}")]
    Shape(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let e = Error::Shape("mean has length 3, expected 2".into());
        assert_eq!(e.to_string(), "Shape error: mean has length 3, expected 2");

        let e = Error::Validation("unknown family 'foo'".into());
        assert!(e.to_string().starts_with("Validation error"));
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: Error = io.into();
        assert!(matches!(e, Error::Io(_)));
    }
}
