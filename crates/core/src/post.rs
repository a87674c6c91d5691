//! Single post transpilation.
//!
//! The [`Transpiler`] runs one post through the whole pipeline: attachment
//! placeholders are merged into the raw body, the result is parsed and
//! classified, accepted posts are rendered, and image attachments the body
//! never showed are appended at the end.
//!
//! # Example
//!
//! ```rust
//! use threadwiki_core::{Post, Transpiler, TranspileConfig};
//!
//! let config = TranspileConfig::builder().min_length(0).build();
//! let transpiler = Transpiler::with_config(config);
//!
//! let post = transpiler.transpile(Post::new("<b>第一章</b>")).unwrap();
//! assert_eq!(post.text, "'''第一章'''");
//! assert!(post.images.is_empty());
//! ```

use crate::TranspileConfig;
use crate::attachment::{PostAttachments, merge_attachments};
use crate::classify::{Rejection, classify};
use crate::fragment::Fragment;
use crate::image::{ImageManifest, is_decorative, resolve_identifier};
use crate::render::{Renderer, image_markup};

/// A raw post as received from the forum.
#[derive(Debug, Clone, Default)]
pub struct Post {
    /// Body HTML, still containing attachment placeholders.
    pub html: String,
    /// Attachment table and the ids not yet displayed.
    pub attachments: PostAttachments,
}

impl Post {
    /// Creates a post without attachments.
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into(), attachments: PostAttachments::default() }
    }

    /// Creates a post with its attachment state.
    pub fn with_attachments(html: impl Into<String>, attachments: PostAttachments) -> Self {
        Self { html: html.into(), attachments }
    }
}

/// Result of transpiling an accepted post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranspiledPost {
    /// Rendered wikitext, including appended attachment images.
    pub text: String,
    /// Images the post contributes, keyed by file name.
    pub images: ImageManifest,
}

/// Transpiles posts with a fixed configuration.
///
/// Transpiling is a pure computation over one post, so a transpiler can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Transpiler {
    config: TranspileConfig,
}

impl Transpiler {
    /// Creates a transpiler with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TranspileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranspileConfig {
        &self.config
    }

    /// Decides whether a post is kept, without rendering it.
    ///
    /// Placeholders are stripped before parsing the same way
    /// [`Transpiler::transpile`] would substitute them.
    pub fn classify(&self, post: &Post) -> std::result::Result<usize, Rejection> {
        let mut attachments = post.attachments.clone();
        let merged = merge_attachments(&post.html, &mut attachments, &self.config);
        classify(&Fragment::parse(&merged), &self.config)
    }

    /// Transpiles a post.
    ///
    /// Returns `None` when the post is a quote reply or too short. An
    /// accepted post always yields a complete rendering.
    pub fn transpile(&self, post: Post) -> Option<TranspiledPost> {
        let Post { html, mut attachments } = post;

        let merged = merge_attachments(&html, &mut attachments, &self.config);
        let fragment = Fragment::parse(&merged);

        if let Err(rejection) = classify(&fragment, &self.config) {
            tracing::debug!(?rejection, "post rejected");
            return None;
        }

        let mut renderer = Renderer::new(&self.config);
        let mut text = renderer.render_fragment(&fragment);
        let mut images = renderer.into_images();

        for (aid, attachment) in attachments.residual() {
            let url = attachment.source_url(&self.config);
            if is_decorative(&url, &self.config) {
                continue;
            }
            let id = resolve_identifier(&url);
            tracing::debug!(attachment = %aid, image = %id, "appending attachment not shown inline");
            text.push_str("\n\n");
            text.push_str(&image_markup(&id, attachment.title()));
            images.insert(id, url);
        }

        Some(TranspiledPost { text, images })
    }
}
