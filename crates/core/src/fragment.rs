//! Post body parsing.
//!
//! This module provides the [`Fragment`] type, the parsed tree of a single
//! post body. The body is parsed as an HTML fragment, so every post hangs off
//! one synthetic root element regardless of how many top-level nodes it has.
//!
//! # Example
//!
//! ```rust
//! use threadwiki_core::Fragment;
//!
//! let fragment = Fragment::parse("<b>Hello</b> world");
//! assert_eq!(fragment.text_content(), "Hello world");
//! assert_eq!(fragment.top_level_elements().count(), 1);
//! ```

use scraper::{ElementRef, Html};

/// Parsed form of a post body.
///
/// Built once per post, consumed by classification and rendering, then
/// dropped.
pub struct Fragment {
    html: Html,
}

impl Fragment {
    /// Parses a post body.
    ///
    /// Parsing is lenient: malformed markup is repaired the way a browser
    /// would, so this never fails.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_fragment(html) }
    }

    /// The synthetic root wrapping the body.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Element children directly under the root.
    pub fn top_level_elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.root().children().filter_map(ElementRef::wrap)
    }

    /// Concatenation of every text node in the body.
    pub fn text_content(&self) -> String {
        text_content(self.root())
    }

    /// Length of [`Fragment::text_content`] in characters.
    pub fn text_len(&self) -> usize {
        self.root().text().map(|t| t.chars().count()).sum()
    }
}

/// Flattened text of an element and its descendants.
pub fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Returns true if the element's class list contains `class`.
pub fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}
