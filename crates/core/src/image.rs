//! Image identity resolution.
//!
//! Every distinct image URL gets a name derived from the URL itself: a UUID v5
//! in the URL namespace plus an extension taken from the last path segment.
//! The same picture discovered from two posts, or from both inline markup and
//! an attachment table, therefore maps to the same file name without any
//! shared counter.
//!
//! # Example
//!
//! ```rust
//! use threadwiki_core::image::resolve_identifier;
//!
//! let a = resolve_identifier("https://lgqm.gq/data/attachment/forum/a.PNG");
//! let b = resolve_identifier("https://lgqm.gq/data/attachment/forum/a.PNG");
//! assert_eq!(a, b);
//! assert_eq!(a.extension(), "png");
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;

use crate::TranspileConfig;

/// Extensions kept as-is; anything else falls back to [`DEFAULT_EXTENSION`].
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "gif", "webp"];

/// Extension used when the URL does not end in a known image type.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Stable identifier of an image URL.
///
/// Displays as the file name, `<uuid>.<extension>`, which is also the key
/// used in an [`ImageManifest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId {
    stem: Uuid,
    extension: &'static str,
}

impl ImageId {
    /// Name-based UUID of the URL.
    pub fn stem(&self) -> Uuid {
        self.stem
    }

    /// Lowercase file extension without the dot.
    pub fn extension(&self) -> &'static str {
        self.extension
    }

    /// The file name, `<stem>.<extension>`.
    pub fn file_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.stem, self.extension)
    }
}

/// Computes the identifier of an absolute image URL.
///
/// Deterministic across calls and processes.
pub fn resolve_identifier(absolute_url: &str) -> ImageId {
    ImageId { stem: Uuid::new_v5(&Uuid::NAMESPACE_URL, absolute_url.as_bytes()), extension: image_extension(absolute_url) }
}

/// Picks the file extension for an image URL.
///
/// The text after the last `/` or `.` of the path (query and fragment
/// removed) is lowercased and kept if it is a known image type.
pub fn image_extension(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let tail = path.rsplit(['/', '.']).next().unwrap_or(path).to_lowercase();

    IMAGE_EXTENSIONS
        .iter()
        .find(|ext| **ext == tail)
        .copied()
        .unwrap_or(DEFAULT_EXTENSION)
}

/// Returns true for forum smiley icons, which never reach the output.
pub fn is_decorative(url: &str, config: &TranspileConfig) -> bool {
    config.smiley_pattern.is_match(url)
}

/// Ordered mapping from image file name to source URL.
///
/// Keys are unique and an identifier is never reassigned to another URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageManifest {
    entries: IndexMap<String, String>,
}

impl ImageManifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an image.
    ///
    /// Returns `true` if the entry is new. Re-inserting an identifier is a
    /// no-op; the first URL recorded for it is kept.
    pub fn insert(&mut self, id: ImageId, url: impl Into<String>) -> bool {
        let key = id.file_name();
        if let Some(existing) = self.entries.get(&key) {
            let url = url.into();
            if *existing != url {
                tracing::warn!(image = %key, kept = %existing, ignored = %url, "image identifier collision");
            }
            return false;
        }
        self.entries.insert(key, url.into());
        true
    }

    /// Merges another manifest into this one, keeping existing entries.
    ///
    /// Returns the number of entries that were new.
    pub fn merge(&mut self, other: ImageManifest) -> usize {
        let mut added = 0;
        for (key, url) in other.entries {
            if let Some(existing) = self.entries.get(&key) {
                if *existing != url {
                    tracing::warn!(image = %key, kept = %existing, ignored = %url, "image identifier collision");
                }
                continue;
            }
            self.entries.insert(key, url);
            added += 1;
        }
        added
    }

    /// Get the source URL recorded for a file name
    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.entries.get(file_name).map(String::as_str)
    }

    /// Iterate over `(file name, URL)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
