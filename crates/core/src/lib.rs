//! Transpile forum thread posts into wikitext.
//!
//! A post body is HTML interleaved with `[attach]id[/attach]` placeholders.
//! The [`Transpiler`] substitutes the placeholders, decides whether the post
//! is original content, renders it to wikitext and collects every image it
//! shows under a name derived from the image URL. A [`Thread`] folds the
//! accepted posts into one ordered document and one deduplicated manifest.
//!
//! # Example
//!
//! ```rust
//! use threadwiki_core::{Post, Thread, TranspileConfig, Transpiler};
//!
//! let config = TranspileConfig::builder().min_length(0).build();
//! let transpiler = Transpiler::with_config(config);
//!
//! let mut thread = Thread::new(7319, "临高启明", "作者");
//! thread.extend_with(&transpiler, vec![Post::new("<p>第一章</p>"), Post::new("<b>第二章</b>")]);
//!
//! assert_eq!(thread.document(), "\n\n第一章\n\n\n\n\n'''第二章'''");
//! ```

pub mod attachment;
pub mod classify;
pub mod config;
pub mod error;
pub mod formatters;
pub mod fragment;
pub mod image;
pub mod names;
pub mod payload;
pub mod post;
pub mod render;
pub mod thread;

pub use attachment::{Attachment, AttachmentId, PostAttachments, merge_attachments};
pub use classify::{Rejection, classify, is_original_content, is_quote_reply};
pub use config::{TranspileConfig, TranspileConfigBuilder, UnknownTagPolicy};
pub use error::{Result, ThreadwikiError};
pub use formatters::{JsonConfig, JsonFormatter, WikitextConfig, WikitextFormatter};
pub use formatters::{convert_to_json, convert_to_wikitext, manifest_to_json};
pub use fragment::Fragment;
pub use image::{ImageId, ImageManifest, image_extension, is_decorative, resolve_identifier};
pub use names::{parse_title, safe_name};
pub use payload::{RawAttachment, RawPost, ThreadInfo, ThreadPayload};
pub use post::{Post, TranspiledPost, Transpiler};
pub use render::{Renderer, Tag, image_markup};
pub use thread::{POST_SEPARATOR, Thread};
