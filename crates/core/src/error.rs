//! Error types for threadwiki operations.
//!
//! Transpiling a post never fails: malformed markup, unknown attachments and
//! unrecognized tags all degrade gracefully. The errors defined here come from
//! the edges of the crate, building a [`TranspileConfig`](crate::TranspileConfig)
//! and decoding a forum API payload.
//!
//! # Example
//!
//! ```rust
//! use threadwiki_core::{ThreadwikiError, TranspileConfig};
//!
//! match TranspileConfig::builder().server("not a url") {
//!     Ok(_) => unreachable!(),
//!     Err(ThreadwikiError::InvalidUrl(reason)) => println!("bad server: {}", reason),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Main error type for threadwiki operations.
#[derive(Error, Debug)]
pub enum ThreadwikiError {
    /// Invalid server URL provided.
    ///
    /// Returned when the configured server base URL cannot be parsed
    /// or cannot act as a base for relative links.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid regular expression.
    ///
    /// Returned when a configured pattern (such as the smiley path pattern)
    /// does not compile.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Payload decoding errors.
    ///
    /// Wraps JSON errors raised while reading a forum API response.
    #[error("Failed to decode payload: {0}")]
    PayloadError(#[from] serde_json::Error),

    /// A required field is missing from the forum API response.
    #[error("Missing payload field: {0}")]
    MissingField(&'static str),
}

/// Result type alias for ThreadwikiError.
pub type Result<T> = std::result::Result<T, ThreadwikiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ThreadwikiError::InvalidUrl("relative URL without a base".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_missing_field_error() {
        let err = ThreadwikiError::MissingField("Variables.thread.subject");
        assert!(err.to_string().contains("Variables.thread.subject"));
    }

    #[test]
    fn test_payload_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ThreadwikiError = json_err.into();
        assert!(matches!(err, ThreadwikiError::PayloadError(_)));
    }
}
