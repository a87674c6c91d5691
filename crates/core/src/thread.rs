//! Thread aggregation.
//!
//! A [`Thread`] is the only place where results of different posts meet. It
//! keeps accepted post texts in reply order and one image manifest for the
//! whole thread. Posts may be transpiled in parallel, but folding them into a
//! thread happens through `&mut Thread`, one post at a time, in reply order.

use serde::Serialize;

use crate::image::ImageManifest;
use crate::post::{Post, TranspiledPost, Transpiler};

/// Document separator used when joining post texts.
pub const POST_SEPARATOR: &str = "\n\n\n";

/// The accepted content of one forum thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thread {
    /// Forum thread id.
    pub id: u64,
    /// Work title, already filesystem safe.
    pub title: String,
    /// Thread author.
    pub author: String,
    /// Rendered post texts in reply order.
    pub posts: Vec<String>,
    /// Image file name to source URL, for the whole thread.
    pub images: ImageManifest,
}

impl Thread {
    pub fn new(id: u64, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self { id, title: title.into(), author: author.into(), posts: Vec::new(), images: ImageManifest::new() }
    }

    /// Appends a transpiled post and merges its images.
    ///
    /// Returns the number of images new to the thread.
    pub fn push(&mut self, post: TranspiledPost) -> usize {
        self.posts.push(post.text);
        self.images.merge(post.images)
    }

    /// Transpiles posts in arrival order and appends the accepted ones.
    ///
    /// Returns the number of accepted posts.
    pub fn extend_with(&mut self, transpiler: &Transpiler, posts: impl IntoIterator<Item = Post>) -> usize {
        let mut accepted = 0;
        for (index, post) in posts.into_iter().enumerate() {
            let Some(transpiled) = transpiler.transpile(post) else {
                continue;
            };
            let images = transpiled.images.len();
            self.push(transpiled);
            accepted += 1;
            if images > 0 {
                tracing::info!(thread = self.id, floor = index + 1, images, "post has image attachments");
            }
        }
        accepted
    }

    /// Post texts joined with [`POST_SEPARATOR`].
    pub fn document(&self) -> String {
        self.posts.join(POST_SEPARATOR)
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TranspileConfig;
    use crate::attachment::{Attachment, AttachmentId, PostAttachments};
    use crate::image::resolve_identifier;
    use indexmap::IndexMap;

    fn transpiler() -> Transpiler {
        Transpiler::with_config(TranspileConfig::builder().min_length(0).build())
    }

    fn image_post(html: &str, aid: &str, file: &str) -> Post {
        let mut table = IndexMap::new();
        table.insert(AttachmentId::from(aid), Attachment::new("http://x/", file));
        Post::with_attachments(html, PostAttachments::new(table, vec![AttachmentId::from(aid)]))
    }

    #[test]
    fn test_posts_keep_reply_order() {
        let mut thread = Thread::new(7319, "临高启明", "作者");
        let posts = vec![Post::new("一"), Post::new("二"), Post::new("三")];

        assert_eq!(thread.extend_with(&transpiler(), posts), 3);
        assert_eq!(thread.posts, vec!["一", "二", "三"]);
        assert_eq!(thread.document(), "一\n\n\n二\n\n\n三");
    }

    #[test]
    fn test_rejected_posts_contribute_nothing() {
        let mut thread = Thread::new(1, "t", "a");
        let posts = vec![
            Post::new("原创"),
            image_post(r#"<div class="quote">Bob 发表于 2021-3-4</div>[attach]1[/attach]"#, "1", "quoted.png"),
        ];

        assert_eq!(thread.extend_with(&transpiler(), posts), 1);
        assert_eq!(thread.posts, vec!["原创"]);
        assert!(thread.images.is_empty());
    }

    #[test]
    fn test_same_image_from_two_posts_recorded_once() {
        let mut thread = Thread::new(1, "t", "a");
        let posts = vec![
            image_post("第一次[attach]1[/attach]", "1", "same.png"),
            Post::new(r#"第二次<img src="http://x/same.png">"#),
        ];

        thread.extend_with(&transpiler(), posts);
        let id = resolve_identifier("http://x/same.png");

        assert_eq!(thread.posts.len(), 2);
        assert_eq!(thread.images.len(), 1);
        assert_eq!(thread.images.get(&id.file_name()), Some("http://x/same.png"));
    }

    #[test]
    fn test_push_reports_new_images() {
        let mut thread = Thread::new(1, "t", "a");
        let first = transpiler().transpile(image_post("[attach]1[/attach]", "1", "a.png")).unwrap();
        let again = first.clone();

        assert_eq!(thread.push(first), 1);
        assert_eq!(thread.push(again), 0);
        assert_eq!(thread.posts.len(), 2);
    }

    #[test]
    fn test_serialize_thread() {
        let mut thread = Thread::new(42, "标题", "作者");
        thread.push(TranspiledPost { text: "正文".to_string(), images: ImageManifest::new() });

        let json = serde_json::to_value(&thread).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["posts"][0], "正文");
        assert!(json["images"].is_object());
    }
}
