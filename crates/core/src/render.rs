//! Tree to wikitext rendering.
//!
//! Each element is rendered bottom-up: its children are rendered and
//! concatenated in document order, then the transform for the element's tag
//! wraps the result. Text nodes are trimmed and passed through verbatim.
//!
//! # Example
//!
//! ```rust
//! use threadwiki_core::{Fragment, Renderer, TranspileConfig};
//!
//! let config = TranspileConfig::default();
//! let fragment = Fragment::parse("<h2> Chapter </h2><b>bold</b>");
//! let mut renderer = Renderer::new(&config);
//! assert_eq!(renderer.render_fragment(&fragment), "\n\n==Chapter==\n\n'''bold'''");
//! ```

use scraper::{ElementRef, Node};

use crate::TranspileConfig;
use crate::config::UnknownTagPolicy;
use crate::fragment::{Fragment, has_class, text_content};
use crate::image::{ImageId, ImageManifest, is_decorative, resolve_identifier};

/// Render strategy selected by tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// `a`: external link `[url text]`.
    Anchor,
    /// `b`, `strong`.
    Bold,
    /// `i`, `em`.
    Italic,
    /// `u`.
    Underline,
    /// `blockquote`: wrapped in annotation markers.
    BlockQuote,
    /// `br`.
    LineBreak,
    /// `p`.
    Paragraph,
    /// `h1` to `h6`, carrying the level.
    Heading(u8),
    /// `ol`.
    OrderedList,
    /// `ul`.
    UnorderedList,
    /// `li`.
    ListItem,
    /// `font`, `div`, `span`: children pass through.
    Container,
    /// `img`.
    Image,
    /// Anything else.
    Unknown,
}

impl Tag {
    /// Looks up the strategy for a tag name, case-insensitively.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "A" => Self::Anchor,
            "B" | "STRONG" => Self::Bold,
            "I" | "EM" => Self::Italic,
            "U" => Self::Underline,
            "BLOCKQUOTE" => Self::BlockQuote,
            "BR" => Self::LineBreak,
            "P" => Self::Paragraph,
            "H1" => Self::Heading(1),
            "H2" => Self::Heading(2),
            "H3" => Self::Heading(3),
            "H4" => Self::Heading(4),
            "H5" => Self::Heading(5),
            "H6" => Self::Heading(6),
            "OL" => Self::OrderedList,
            "UL" => Self::UnorderedList,
            "LI" => Self::ListItem,
            "FONT" | "DIV" | "SPAN" => Self::Container,
            "IMG" => Self::Image,
            _ => Self::Unknown,
        }
    }
}

/// Wikitext reference to a downloaded image.
///
/// Link delimiters in the title are replaced by their fullwidth forms.
pub fn image_markup(id: &ImageId, title: Option<&str>) -> String {
    let title = title.map(|title| {
        title
            .chars()
            .map(|c| match c {
                '|' => '｜',
                '[' => '［',
                ']' => '］',
                c => c,
            })
            .collect::<String>()
    });

    match title {
        Some(title) => format!("[[File:{}|{}]]", id, title),
        None => format!("[[File:{}]]", id),
    }
}

/// Renders post fragments and collects the images they display.
pub struct Renderer<'c> {
    config: &'c TranspileConfig,
    images: ImageManifest,
}

impl<'c> Renderer<'c> {
    pub fn new(config: &'c TranspileConfig) -> Self {
        Self { config, images: ImageManifest::new() }
    }

    /// Renders everything under the fragment's synthetic root.
    pub fn render_fragment(&mut self, fragment: &Fragment) -> String {
        self.render_children(fragment.root())
    }

    /// Renders the children of an element and concatenates them.
    pub fn render_children(&mut self, element: ElementRef<'_>) -> String {
        let mut output = String::new();
        for child in element.children() {
            match child.value() {
                Node::Text(text) => output.push_str(text.trim()),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        output.push_str(&self.render_node(child));
                    }
                }
                _ => {}
            }
        }
        output
    }

    /// Renders an element and its subtree.
    pub fn render_node(&mut self, element: ElementRef<'_>) -> String {
        let tag = Tag::from_name(element.value().name());

        match tag {
            Tag::Image => return self.render_image(element),
            Tag::LineBreak => return "\n\n".to_string(),
            Tag::Italic if has_class(element, &self.config.status_class) => return String::new(),
            Tag::Unknown => {
                tracing::warn!(tag = element.value().name(), "unknown tag");
                if self.config.unknown_tags == UnknownTagPolicy::FlattenText {
                    return text_content(element);
                }
            }
            _ => {}
        }

        let contents = self.render_children(element);
        match tag {
            Tag::Anchor => {
                let href = self.config.absolute_url(element.value().attr("href").unwrap_or(""));
                format!("[{} {}]", href, contents)
            }
            Tag::Bold => format!("'''{}'''", contents),
            Tag::Italic => format!("''{}''", contents),
            Tag::Underline => format!("<u>{}</u>", contents),
            Tag::BlockQuote => format!("{}{}{}", self.config.annotation_start, contents, self.config.annotation_end),
            Tag::Paragraph => format!("\n\n{}\n\n", contents.trim()),
            Tag::Heading(level) => {
                let marks = "=".repeat(usize::from(level));
                format!("\n\n{}{}{}\n\n", marks, contents.trim(), marks)
            }
            Tag::OrderedList => format!("\n<ol>\n{}\n</ol>\n", contents.trim()),
            Tag::UnorderedList => format!("\n<ul>\n{}\n</ul>\n", contents.trim()),
            Tag::ListItem => format!("<li>{}</li>\n", contents.trim()),
            Tag::Container | Tag::Unknown => contents,
            Tag::Image | Tag::LineBreak => unreachable!("handled before rendering children"),
        }
    }

    /// Resolves an `img` element, records it and returns its markup.
    ///
    /// Lazy-loaded images keep the real source in `zoomfile` or `file`.
    fn render_image(&mut self, element: ElementRef<'_>) -> String {
        let source = ["zoomfile", "file", "src"]
            .iter()
            .filter_map(|name| element.value().attr(name))
            .map(str::trim)
            .find(|value| !value.is_empty());

        let Some(source) = source else {
            tracing::warn!("img element without a source");
            return String::new();
        };

        let url = self.config.absolute_url(source);
        if is_decorative(&url, self.config) {
            tracing::debug!(url = %url, "skipping decorative image");
            return String::new();
        }

        let title = ["title", "alt"]
            .iter()
            .filter_map(|name| element.value().attr(name))
            .map(str::trim)
            .find(|value| !value.is_empty());

        let id = resolve_identifier(&url);
        self.images.insert(id, url);
        image_markup(&id, title)
    }

    /// Consumes the renderer, returning the recorded images.
    pub fn into_images(self) -> ImageManifest {
        self.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn render_with(html: &str, config: &TranspileConfig) -> (String, ImageManifest) {
        let fragment = Fragment::parse(html);
        let mut renderer = Renderer::new(config);
        let text = renderer.render_fragment(&fragment);
        (text, renderer.into_images())
    }

    fn render(html: &str) -> String {
        render_with(html, &TranspileConfig::default()).0
    }

    #[rstest]
    #[case(1, "\n\n=Title=\n\n")]
    #[case(2, "\n\n==Title==\n\n")]
    #[case(3, "\n\n===Title===\n\n")]
    #[case(4, "\n\n====Title====\n\n")]
    #[case(5, "\n\n=====Title=====\n\n")]
    #[case(6, "\n\n======Title======\n\n")]
    fn test_heading_levels(#[case] level: u8, #[case] expected: &str) {
        let html = format!("<h{0}>  Title  </h{0}>", level);
        assert_eq!(render(&html), expected);
    }

    #[rstest]
    #[case("a", Tag::Anchor)]
    #[case("STRONG", Tag::Bold)]
    #[case("em", Tag::Italic)]
    #[case("h4", Tag::Heading(4))]
    #[case("span", Tag::Container)]
    #[case("table", Tag::Unknown)]
    fn test_tag_from_name(#[case] name: &str, #[case] expected: Tag) {
        assert_eq!(Tag::from_name(name), expected);
    }

    #[test]
    fn test_inline_styles() {
        assert_eq!(render("<b>bold</b>"), "'''bold'''");
        assert_eq!(render("<strong>strong</strong>"), "'''strong'''");
        assert_eq!(render("<i>italic</i>"), "''italic''");
        assert_eq!(render("<u>under</u>"), "<u>under</u>");
    }

    #[test]
    fn test_status_italic_is_dropped() {
        assert_eq!(render(r#"<i class="pstatus"> 本帖最后由 admin 于 2020-1-1 编辑 </i>正文"#), "正文");
    }

    #[test]
    fn test_anchor_resolves_against_server() {
        assert_eq!(
            render(r#"<a href="thread-7319-1-1.html">上一章</a>"#),
            "[https://lgqm.gq/thread-7319-1-1.html 上一章]"
        );
        assert_eq!(render(r#"<a href="http://other.org/">外链</a>"#), "[http://other.org/ 外链]");
    }

    #[test]
    fn test_blockquote_markers() {
        assert_eq!(render("<blockquote>注释</blockquote>"), "{{同人注释start}}注释{{同人注释end}}");
    }

    #[test]
    fn test_paragraph_and_break() {
        assert_eq!(render("<p>  first </p>"), "\n\nfirst\n\n");
        assert_eq!(render("line one<br />line two"), "line one\n\nline two");
    }

    #[test]
    fn test_text_children_are_trimmed() {
        assert_eq!(render("  lead <font color=\"red\"> red </font>  tail  "), "leadredtail");
    }

    #[test]
    fn test_nested_markup() {
        assert_eq!(render("<div><font size=\"4\"><b><i>deep</i></b></font></div>"), "'''''deep'''''");
    }

    #[test]
    fn test_lists() {
        assert_eq!(render("<ul>\n<li> one </li>\n<li>two</li>\n</ul>"), "\n<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n");
        assert_eq!(render("<ol><li>first</li></ol>"), "\n<ol>\n<li>first</li>\n</ol>\n");
    }

    #[test]
    fn test_unknown_tag_renders_children_by_default() {
        assert_eq!(render("<table><tr><td><b>cell</b></td></tr></table>"), "'''cell'''");
    }

    #[test]
    fn test_unknown_tag_flatten_text() {
        let config = TranspileConfig::builder().unknown_tags(UnknownTagPolicy::FlattenText).build();
        let (text, _) = render_with("<strike>old <b>bold</b></strike>", &config);
        assert_eq!(text, "old bold");
    }

    #[test]
    fn test_image_is_recorded() {
        let config = TranspileConfig::default();
        let (text, images) = render_with(r#"<img src="data/attachment/forum/a.png" alt="插图">"#, &config);

        let url = "https://lgqm.gq/data/attachment/forum/a.png";
        let id = resolve_identifier(url);
        assert_eq!(text, format!("[[File:{}|插图]]", id));
        assert_eq!(images.get(&id.file_name()), Some(url));
    }

    #[test]
    fn test_lazy_image_prefers_zoomfile() {
        let config = TranspileConfig::default();
        let html = r#"<img src="static/image/common/none.gif" file="data/b.jpg" zoomfile="data/b_big.jpg">"#;
        let (text, images) = render_with(html, &config);

        let id = resolve_identifier("https://lgqm.gq/data/b_big.jpg");
        assert_eq!(text, format!("[[File:{}]]", id));
        assert_eq!(images.len(), 1);
    }

    #[test]
    fn test_smiley_is_excluded() {
        let config = TranspileConfig::default();
        let (text, images) = render_with(r#"好<img src="static/image/smiley/default/smile.gif" smilieid="1">"#, &config);

        assert_eq!(text, "好");
        assert!(images.is_empty());
    }

    #[test]
    fn test_image_without_source() {
        let config = TranspileConfig::default();
        let (text, images) = render_with(r#"<img alt="broken"><img src="  ">"#, &config);
        assert_eq!(text, "");
        assert!(images.is_empty());
    }

    #[test]
    fn test_same_image_twice_recorded_once() {
        let config = TranspileConfig::default();
        let (text, images) = render_with(r#"<img src="http://x/a.png"><img src="http://x/a.png">"#, &config);
        assert_eq!(text.matches("[[File:").count(), 2);
        assert_eq!(images.len(), 1);
    }

    #[test]
    fn test_image_title_cannot_close_link() {
        let id = resolve_identifier("http://x/a.png");
        assert_eq!(image_markup(&id, Some("a|b]]c.png")), format!("[[File:{}|a｜b］］c.png]]", id));
        assert_eq!(image_markup(&id, None), format!("[[File:{}]]", id));
    }

    #[test]
    fn test_image_alt_with_delimiters() {
        let (text, _) = render_with(r#"<img src="http://x/a.png" alt="[[x]]|y">"#, &TranspileConfig::default());
        let id = resolve_identifier("http://x/a.png");
        assert_eq!(text, format!("[[File:{}|［［x］］｜y]]", id));
    }
}
