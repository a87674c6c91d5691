//! Quote-reply detection.
//!
//! A post whose top level carries a quote box stamped "<user> 发表于 <date>"
//! is a reply to someone else and is dropped whatever its length. Other posts
//! are kept once their visible text reaches the configured minimum length.

use regex::Regex;

use crate::TranspileConfig;
use crate::fragment::{Fragment, has_class, text_content};

/// Why a post was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The post quotes another user's message.
    QuoteReply,
    /// The post's visible text is shorter than the configured floor.
    TooShort { length: usize, min_length: usize },
}

/// Returns true if a top-level quote box carries a "posted by" stamp.
pub fn is_quote_reply(fragment: &Fragment, config: &TranspileConfig) -> bool {
    let stamp = Regex::new(r"\S+\s发表于\s\d{4}-\d{1,2}-\d{1,2}").unwrap();

    fragment
        .top_level_elements()
        .filter(|el| el.value().name() == "div" && has_class(*el, &config.quote_class))
        .any(|el| stamp.is_match(&text_content(el)))
}

/// Classifies a parsed post.
///
/// Returns `Ok(length)` with the visible text length when the post is
/// original content, or the reason it was rejected.
pub fn classify(fragment: &Fragment, config: &TranspileConfig) -> Result<usize, Rejection> {
    if is_quote_reply(fragment, config) {
        return Err(Rejection::QuoteReply);
    }

    let length = fragment.text_len();
    if length < config.min_length {
        return Err(Rejection::TooShort { length, min_length: config.min_length });
    }

    Ok(length)
}

/// Returns true if the post should be kept.
pub fn is_original_content(fragment: &Fragment, config: &TranspileConfig) -> bool {
    classify(fragment, config).is_ok()
}
