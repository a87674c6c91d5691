pub mod json;
pub mod wikitext;

pub use json::{JsonConfig, JsonFormatter, convert_to_json, manifest_to_json};
pub use wikitext::{WikitextConfig, WikitextFormatter, convert_to_wikitext};
