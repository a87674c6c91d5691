//! Forum API response decoding.
//!
//! The forum's mobile API (`module=viewthread`) answers with a JSON document
//! whose scalars are mostly strings, whose ids may be strings or numbers, and
//! whose empty maps are serialized as `[]`. This module turns such a response
//! into a [`Thread`] shell and core [`Post`]s; fetching it is up to the caller.
//!
//! # Example
//!
//! ```rust
//! use threadwiki_core::{ThreadPayload, Transpiler, TranspileConfig};
//!
//! let json = r#"{"Variables": {
//!     "thread": {"tid": "7319", "subject": "【同人】临高启明 外传", "author": "某人", "authorid": "1", "replies": "1"},
//!     "postlist": [{"message": "第一章", "attachments": [], "imagelist": null}]
//! }}"#;
//!
//! let payload = ThreadPayload::from_json(json)?;
//! let mut thread = payload.new_thread(None);
//! let transpiler = Transpiler::with_config(TranspileConfig::builder().min_length(0).build());
//! thread.extend_with(&transpiler, payload.posts());
//!
//! assert_eq!(thread.id, 7319);
//! assert_eq!(thread.title, "临高启明");
//! assert_eq!(thread.posts, vec!["第一章"]);
//! # Ok::<(), threadwiki_core::ThreadwikiError>(())
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::attachment::{Attachment, AttachmentId, PostAttachments};
use crate::names::{parse_title, safe_name};
use crate::post::Post;
use crate::thread::Thread;
use crate::{Result, ThreadwikiError};

/// A JSON scalar the forum may use for ids, counts and flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }

    fn is_truthy(&self) -> bool {
        match self {
            Scalar::Str(s) => {
                let s = s.trim();
                !s.is_empty() && s != "0"
            }
            Scalar::Int(n) => *n != 0,
            Scalar::Float(f) => *f != 0.0,
            Scalar::Bool(b) => *b,
        }
    }
}

fn de_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string).unwrap_or_default())
}

fn de_optional_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.is_some_and(|s| s.is_truthy()))
}

fn de_ids<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<String>, D::Error> {
    let ids = Option::<Vec<Scalar>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(ids.into_iter().map(Scalar::into_string).collect())
}

/// Attachment tables come as an object keyed by id, or `[]` when empty.
#[derive(Deserialize)]
#[serde(untagged)]
enum AttachmentTable {
    Map(IndexMap<String, RawAttachment>),
    List(Vec<RawAttachment>),
}

fn de_attachments<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<(String, RawAttachment)>, D::Error> {
    let entries = match Option::<AttachmentTable>::deserialize(deserializer)? {
        Some(AttachmentTable::Map(map)) => map.into_iter().collect(),
        Some(AttachmentTable::List(list)) => list
            .into_iter()
            .filter_map(|a| a.aid.clone().map(|aid| (aid, a)))
            .collect(),
        None => Vec::new(),
    };
    Ok(entries)
}

/// Thread header fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadInfo {
    #[serde(default, deserialize_with = "de_string")]
    pub tid: String,
    #[serde(default, deserialize_with = "de_string")]
    pub subject: String,
    #[serde(default, deserialize_with = "de_string")]
    pub author: String,
    #[serde(default, deserialize_with = "de_string")]
    pub authorid: String,
    #[serde(default, deserialize_with = "de_string")]
    pub replies: String,
    #[serde(default, deserialize_with = "de_optional_string")]
    pub lastpost: Option<String>,
}

impl ThreadInfo {
    /// Numeric thread id, or 0 when the forum sent something else.
    pub fn id(&self) -> u64 {
        self.tid.trim().parse().unwrap_or(0)
    }

    /// Number of replies, used by callers to fetch a thread in one page.
    pub fn reply_count(&self) -> usize {
        self.replies.trim().parse().unwrap_or(0)
    }
}

/// One entry of a post's attachment table.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAttachment {
    #[serde(default, deserialize_with = "de_optional_string")]
    pub aid: Option<String>,
    #[serde(default, deserialize_with = "de_string")]
    pub url: String,
    #[serde(default, deserialize_with = "de_string")]
    pub attachment: String,
    #[serde(default, deserialize_with = "de_optional_string")]
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "de_flag")]
    pub isimage: bool,
}

impl From<RawAttachment> for Attachment {
    fn from(raw: RawAttachment) -> Self {
        Attachment { url: raw.url, attachment: raw.attachment, filename: raw.filename, is_image: raw.isimage }
    }
}

/// One post record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPost {
    #[serde(default, deserialize_with = "de_string")]
    pub message: String,
    #[serde(default, deserialize_with = "de_attachments")]
    pub attachments: Vec<(String, RawAttachment)>,
    #[serde(default, deserialize_with = "de_ids")]
    pub imagelist: Vec<String>,
}

impl RawPost {
    /// Converts the record into a core post.
    pub fn to_post(&self) -> Post {
        let table: IndexMap<AttachmentId, Attachment> = self
            .attachments
            .iter()
            .map(|(aid, raw)| (AttachmentId::new(aid.as_str()), Attachment::from(raw.clone())))
            .collect();
        let inline = self.imagelist.iter().map(|aid| AttachmentId::new(aid.as_str()));

        Post::with_attachments(self.message.clone(), PostAttachments::new(table, inline))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Variables {
    thread: Option<ThreadInfo>,
    #[serde(default)]
    postlist: Option<Vec<RawPost>>,
}

#[derive(Debug, Clone, Deserialize)]
struct Envelope {
    #[serde(rename = "Variables")]
    variables: Option<Variables>,
}

/// A decoded `viewthread` response.
#[derive(Debug, Clone)]
pub struct ThreadPayload {
    pub info: ThreadInfo,
    pub posts: Vec<RawPost>,
}

impl ThreadPayload {
    /// Decodes a response body.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadwikiError::PayloadError`] for malformed JSON and
    /// [`ThreadwikiError::MissingField`] when the thread header is absent,
    /// which is how the forum reports missing threads and denied access.
    pub fn from_json(json: &str) -> Result<Self> {
        let envelope: Envelope = serde_json::from_str(json)?;
        Self::from_envelope(envelope)
    }

    /// Decodes an already parsed response.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let envelope: Envelope = serde_json::from_value(value)?;
        Self::from_envelope(envelope)
    }

    fn from_envelope(envelope: Envelope) -> Result<Self> {
        let variables = envelope.variables.ok_or(ThreadwikiError::MissingField("Variables"))?;
        let info = variables.thread.ok_or(ThreadwikiError::MissingField("Variables.thread"))?;
        Ok(Self { info, posts: variables.postlist.unwrap_or_default() })
    }

    pub fn thread_id(&self) -> u64 {
        self.info.id()
    }

    /// Creates the thread the posts will be folded into.
    ///
    /// The title is extracted from the subject unless `title` overrides it;
    /// either way it is made filesystem safe.
    pub fn new_thread(&self, title: Option<&str>) -> Thread {
        let title = match title {
            Some(title) => title.to_string(),
            None => parse_title(&self.info.subject),
        };
        tracing::info!(
            thread = self.thread_id(),
            title = %title,
            author = %self.info.author,
            author_id = %self.info.authorid,
            "reading thread"
        );
        Thread::new(self.thread_id(), safe_name(&title), self.info.author.clone())
    }

    /// Core posts in reply order.
    pub fn posts(&self) -> impl Iterator<Item = Post> + '_ {
        self.posts.iter().map(RawPost::to_post)
    }
}
