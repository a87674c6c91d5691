use crate::thread::{POST_SEPARATOR, Thread};

/// Configuration for wikitext document output
#[derive(Debug, Clone)]
pub struct WikitextConfig {
    /// Text placed between consecutive posts
    pub separator: String,
    /// Include title as a level 1 heading at the start of the document
    pub include_title_heading: bool,
    /// Trim leading and trailing whitespace of each post
    pub trim_posts: bool,
}

impl Default for WikitextConfig {
    fn default() -> Self {
        Self { separator: POST_SEPARATOR.to_string(), include_title_heading: false, trim_posts: false }
    }
}

/// Join a thread's posts into one wikitext document
pub fn convert_to_wikitext(thread: &Thread, config: &WikitextConfig) -> String {
    let mut output = String::new();

    if config.include_title_heading && !thread.title.is_empty() {
        output.push_str(&format!("= {} =", thread.title));
        if !thread.posts.is_empty() {
            output.push_str(&config.separator);
        }
    }

    let posts: Vec<&str> =
        thread.posts.iter().map(|p| if config.trim_posts { p.trim() } else { p.as_str() }).collect();
    output.push_str(&posts.join(&config.separator));

    output
}

/// Wikitext formatter with configurable options
pub struct WikitextFormatter {
    config: WikitextConfig,
}

impl WikitextFormatter {
    pub fn new(config: WikitextConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, thread: &Thread) -> String {
        convert_to_wikitext(thread, &self.config)
    }
}
