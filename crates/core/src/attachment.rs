//! Post attachments and placeholder substitution.
//!
//! Forum bodies reference attachments with `[attach]<id>[/attach]` tokens.
//! These are not markup, so [`merge_attachments`] swaps them for `img`
//! elements before the body is parsed. Whatever the body never displays
//! inline stays in the post's unconsumed set and is appended after rendering.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use regex::{Captures, Regex};

use crate::TranspileConfig;

/// Attachment key shared by the attachment table and placeholder tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachmentId(String);

impl AttachmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AttachmentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for AttachmentId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Metadata of one attachment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attachment {
    /// Directory URL, absolute or relative to the server.
    pub url: String,
    /// Path of the file below `url`.
    pub attachment: String,
    /// Original file name shown to readers.
    pub filename: Option<String>,
    /// Whether the forum flags the attachment as an image.
    pub is_image: bool,
}

impl Attachment {
    pub fn new(url: impl Into<String>, attachment: impl Into<String>) -> Self {
        Self { url: url.into(), attachment: attachment.into(), filename: None, is_image: true }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_image_flag(mut self, is_image: bool) -> Self {
        self.is_image = is_image;
        self
    }

    /// Absolute URL of the file.
    pub fn source_url(&self, config: &TranspileConfig) -> String {
        config.absolute_url(&format!("{}{}", self.url, self.attachment))
    }

    /// Non-empty display name, if any.
    pub fn title(&self) -> Option<&str> {
        self.filename.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }
}

/// The attachment table of a post together with the ids not yet displayed.
///
/// Only [`merge_attachments`] and the transpiler mutate the unconsumed set.
#[derive(Debug, Clone, Default)]
pub struct PostAttachments {
    table: IndexMap<AttachmentId, Attachment>,
    unconsumed: HashSet<AttachmentId>,
}

impl PostAttachments {
    /// Builds the attachment state of a post.
    ///
    /// `inline_ids` are the ids the forum reports as inline images. Ids
    /// absent from `table` are dropped. Every image attachment in `table`
    /// starts out unconsumed as well.
    pub fn new(table: IndexMap<AttachmentId, Attachment>, inline_ids: impl IntoIterator<Item = AttachmentId>) -> Self {
        let mut unconsumed = HashSet::new();
        for id in inline_ids {
            if table.contains_key(&id) {
                unconsumed.insert(id);
            } else {
                tracing::warn!(attachment = %id, "inline attachment missing from attachment table");
            }
        }
        unconsumed.extend(table.iter().filter(|(_, a)| a.is_image).map(|(id, _)| id.clone()));

        Self { table, unconsumed }
    }

    pub fn get(&self, id: &AttachmentId) -> Option<&Attachment> {
        self.table.get(id)
    }

    /// Marks an attachment as displayed and returns its metadata.
    ///
    /// Returns `None` for ids that are not in the table.
    pub fn consume(&mut self, id: &AttachmentId) -> Option<&Attachment> {
        let attachment = self.table.get(id)?;
        self.unconsumed.remove(id);
        Some(attachment)
    }

    pub fn is_consumed(&self, id: &AttachmentId) -> bool {
        self.table.contains_key(id) && !self.unconsumed.contains(id)
    }

    /// Attachments never displayed inline, in table order.
    pub fn residual(&self) -> impl Iterator<Item = (&AttachmentId, &Attachment)> {
        self.table.iter().filter(|(id, _)| self.unconsumed.contains(*id))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Escape a value for use inside a double-quoted HTML attribute
fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Build the inline image element standing in for an attachment
fn image_marker(attachment: &Attachment, config: &TranspileConfig) -> String {
    let src = escape_attr(&attachment.source_url(config));
    match attachment.title() {
        Some(title) => format!(r#"<img src="{}" title="{}">"#, src, escape_attr(title)),
        None => format!(r#"<img src="{}">"#, src),
    }
}

/// Replaces attachment placeholder tokens with inline image elements.
///
/// Known ids become `<img>` elements pointing at the attachment and are
/// marked consumed; unknown ids are removed. Must run before the body is
/// parsed.
pub fn merge_attachments(html: &str, attachments: &mut PostAttachments, config: &TranspileConfig) -> String {
    let re = Regex::new(r"(?i)\[attach\]([^\[\]]*)\[/attach\]").unwrap();

    re.replace_all(html, |caps: &Captures| {
        let id = AttachmentId::new(caps.get(1).map(|m| m.as_str()).unwrap_or(""));
        match attachments.consume(&id) {
            Some(attachment) => image_marker(attachment, config),
            None => {
                tracing::warn!(attachment = %id, "placeholder references unknown attachment");
                String::new()
            }
        }
    })
    .to_string()
}
