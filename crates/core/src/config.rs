//! Transpiler configuration.
//!
//! A [`TranspileConfig`] carries everything the transform needs to know about
//! the forum: where relative links point, how long an accepted post must be,
//! which images are decorative and which markers wrap block quotes. It is
//! passed by reference into every component; there is no global state.
//!
//! # Example
//!
//! ```rust
//! use threadwiki_core::TranspileConfig;
//!
//! let config = TranspileConfig::builder()
//!     .server("https://forum.example.com/")?
//!     .min_length(0)
//!     .build();
//! assert_eq!(config.api_url().as_str(), "https://forum.example.com/api/mobile/");
//! # Ok::<(), threadwiki_core::ThreadwikiError>(())
//! ```

use regex::Regex;
use url::Url;

use crate::{Result, ThreadwikiError};

/// Default forum server.
pub const DEFAULT_SERVER: &str = "https://lgqm.gq/";

/// Path of the mobile API, relative to the server.
pub const API_PATH: &str = "api/mobile/";

/// Default minimum visible length for a post to be kept.
pub const DEFAULT_MIN_LENGTH: usize = 300;

/// Path fragment shared by the forum's static smiley icons.
pub const DEFAULT_SMILEY_PATTERN: &str = r"static/image/smiley/";

/// How the renderer treats tags it has no transform for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTagPolicy {
    /// Emit the node's flattened text, discarding markup produced by
    /// recognized descendants.
    FlattenText,
    /// Emit the already rendered children unchanged.
    #[default]
    RenderChildren,
}

/// Configuration for transpiling posts.
#[derive(Debug, Clone)]
pub struct TranspileConfig {
    /// Base URL that relative links and image sources are resolved against.
    pub server: Url,

    /// Minimum flattened text length, in characters, for a post without a
    /// quote marker to be kept (default: 300, 0 disables the floor).
    pub min_length: usize,

    /// Image sources matching this pattern are decorative and dropped.
    pub smiley_pattern: Regex,

    /// Fallback for unrecognized tags (default: render children).
    pub unknown_tags: UnknownTagPolicy,

    /// Marker emitted before block quote content.
    pub annotation_start: String,

    /// Marker emitted after block quote content.
    pub annotation_end: String,

    /// Class of the `div` wrapping a quoted message.
    pub quote_class: String,

    /// Class of the `i` element carrying "last edited by" noise.
    pub status_class: String,
}

impl Default for TranspileConfig {
    fn default() -> Self {
        Self {
            server: Url::parse(DEFAULT_SERVER).expect("default server URL is valid"),
            min_length: DEFAULT_MIN_LENGTH,
            smiley_pattern: Regex::new(DEFAULT_SMILEY_PATTERN).expect("default smiley pattern is valid"),
            unknown_tags: UnknownTagPolicy::default(),
            annotation_start: "{{同人注释start}}".to_string(),
            annotation_end: "{{同人注释end}}".to_string(),
            quote_class: "quote".to_string(),
            status_class: "pstatus".to_string(),
        }
    }
}

impl TranspileConfig {
    /// Creates a new builder for TranspileConfig.
    pub fn builder() -> TranspileConfigBuilder {
        TranspileConfigBuilder::new()
    }

    /// Endpoint of the forum mobile API.
    pub fn api_url(&self) -> Url {
        self.server.join(API_PATH).unwrap_or_else(|_| self.server.clone())
    }

    /// Resolves a possibly relative reference against the server URL.
    ///
    /// Returns the reference unchanged when it cannot be joined.
    pub fn absolute_url(&self, reference: &str) -> String {
        match self.server.join(reference.trim()) {
            Ok(url) => url.to_string(),
            Err(_) => reference.to_string(),
        }
    }
}

/// Builder for TranspileConfig.
///
/// # Example
///
/// ```rust
/// use threadwiki_core::{TranspileConfig, UnknownTagPolicy};
///
/// let config = TranspileConfig::builder()
///     .min_length(120)
///     .unknown_tags(UnknownTagPolicy::FlattenText)
///     .build();
/// assert_eq!(config.min_length, 120);
/// ```
pub struct TranspileConfigBuilder {
    config: TranspileConfig,
}

impl TranspileConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: TranspileConfig::default() }
    }

    /// Sets the server base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadwikiError::InvalidUrl`] if the URL does not parse or
    /// cannot be used as a base.
    pub fn server(mut self, value: &str) -> Result<Self> {
        let url = Url::parse(value).map_err(|e| ThreadwikiError::InvalidUrl(format!("{}: {}", value, e)))?;
        if url.cannot_be_a_base() {
            return Err(ThreadwikiError::InvalidUrl(format!("{} cannot be a base URL", value)));
        }
        self.config.server = url;
        Ok(self)
    }

    /// Sets the minimum post length.
    pub fn min_length(mut self, value: usize) -> Self {
        self.config.min_length = value;
        self
    }

    /// Sets the decorative image pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadwikiError::InvalidPattern`] if the regex does not compile.
    pub fn smiley_pattern(mut self, value: &str) -> Result<Self> {
        self.config.smiley_pattern = Regex::new(value).map_err(|e| ThreadwikiError::InvalidPattern(e.to_string()))?;
        Ok(self)
    }

    /// Sets the unknown tag policy.
    pub fn unknown_tags(mut self, value: UnknownTagPolicy) -> Self {
        self.config.unknown_tags = value;
        self
    }

    /// Sets the block quote markers.
    pub fn annotation_markers(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.config.annotation_start = start.into();
        self.config.annotation_end = end.into();
        self
    }

    /// Sets the quote container class.
    pub fn quote_class(mut self, value: impl Into<String>) -> Self {
        self.config.quote_class = value.into();
        self
    }

    /// Sets the status marker class.
    pub fn status_class(mut self, value: impl Into<String>) -> Self {
        self.config.status_class = value.into();
        self
    }

    /// Builds the config.
    pub fn build(self) -> TranspileConfig {
        self.config
    }
}

impl Default for TranspileConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
