use crate::Result;
use crate::image::ImageManifest;
use crate::thread::Thread;
use serde::Serialize;

/// Image entry for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct JsonImage<'a> {
    /// File name the image is saved under
    pub file_name: &'a str,
    /// Source URL to download from
    pub url: &'a str,
}

/// Complete JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    pub id: u64,
    pub title: &'a str,
    pub author: &'a str,
    /// Rendered posts, omitted for manifest-only output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<&'a [String]>,
    /// Images in discovery order
    pub images: Vec<JsonImage<'a>>,
}

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Include rendered post texts
    pub include_posts: bool,
    /// Pretty print JSON output
    pub pretty: bool,
}

fn images_of(manifest: &ImageManifest) -> Vec<JsonImage<'_>> {
    manifest.iter().map(|(file_name, url)| JsonImage { file_name, url }).collect()
}

fn to_string<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty { Ok(serde_json::to_string_pretty(value)?) } else { Ok(serde_json::to_string(value)?) }
}

/// Convert a thread to JSON
pub fn convert_to_json(thread: &Thread, config: &JsonConfig) -> Result<String> {
    let output = JsonOutput {
        id: thread.id,
        title: &thread.title,
        author: &thread.author,
        posts: if config.include_posts { Some(thread.posts.as_slice()) } else { None },
        images: images_of(&thread.images),
    };

    to_string(&output, config.pretty)
}

/// Convert an image manifest to a JSON object of file name to URL
pub fn manifest_to_json(manifest: &ImageManifest, pretty: bool) -> Result<String> {
    to_string(manifest, pretty)
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, thread: &Thread) -> Result<String> {
        convert_to_json(thread, &self.config)
    }

    pub fn manifest_only(&self, thread: &Thread) -> Result<String> {
        manifest_to_json(&thread.images, self.config.pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::resolve_identifier;

    fn sample_thread() -> Thread {
        let mut thread = Thread::new(7319, "临高启明", "作者");
        thread.posts.push("'''第一章'''".to_string());
        thread.images.insert(resolve_identifier("http://x/a.png"), "http://x/a.png");
        thread.images.insert(resolve_identifier("http://x/b.gif"), "http://x/b.gif");
        thread
    }

    #[test]
    fn test_convert_to_json_with_posts() {
        let config = JsonConfig { include_posts: true, pretty: false };
        let json_str = convert_to_json(&sample_thread(), &config).unwrap();
        let json: serde_json::Value = serde_json::from_str(&json_str).unwrap();

        assert_eq!(json["id"], 7319);
        assert_eq!(json["title"], "临高启明");
        assert_eq!(json["posts"][0], "'''第一章'''");
        assert_eq!(json["images"][1]["url"], "http://x/b.gif");
        assert!(json["images"][1]["file_name"].as_str().unwrap().ends_with(".gif"));
    }

    #[test]
    fn test_convert_to_json_without_posts() {
        let json_str = convert_to_json(&sample_thread(), &JsonConfig::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&json_str).unwrap();
        assert!(json.get("posts").is_none());
        assert_eq!(json["images"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_manifest_to_json() {
        let thread = sample_thread();
        let json_str = manifest_to_json(&thread.images, true).unwrap();
        assert!(json_str.contains('\n'));

        let json: serde_json::Value = serde_json::from_str(&json_str).unwrap();
        let id = resolve_identifier("http://x/a.png");
        assert_eq!(json[id.file_name()], "http://x/a.png");
    }

    #[test]
    fn test_json_formatter() {
        let formatter = JsonFormatter::new(JsonConfig { include_posts: true, pretty: true });
        let thread = sample_thread();

        assert_eq!(
            formatter.convert(&thread).unwrap(),
            convert_to_json(&thread, &JsonConfig { include_posts: true, pretty: true }).unwrap()
        );
        assert_eq!(formatter.manifest_only(&thread).unwrap(), manifest_to_json(&thread.images, true).unwrap());
    }
}
