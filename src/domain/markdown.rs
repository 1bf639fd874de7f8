//! HTML to Markdown conversion and the Markdown post layout

use crate::domain::post::TransformedPost;
use crate::domain::tags::hashtag_line;
use htmd::HtmlToMarkdown;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Convert an HTML body to Markdown.
///
/// Links stay inline, lines are not wrapped, and surrounding blank
/// content is trimmed. Text outside markup is kept literally, without
/// backslash escapes. If conversion fails the raw HTML is kept.
pub fn html_to_markdown(html: &str) -> String {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style"])
        .build();

    match converter.convert(html) {
        Ok(markdown) => unescape_text(markdown.trim()),
        Err(e) => {
            tracing::warn!("HTML to Markdown conversion failed, keeping HTML: {}", e);
            html.trim().to_string()
        }
    }
}

fn escape_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?s)```.*?```|`[^`\n]*`|\\([\\`*_\[\]=~>#+.-])").unwrap()
    })
}

/// Undo the backslash escapes htmd adds to text nodes. Code spans and
/// fenced blocks are left as they are.
fn unescape_text(markdown: &str) -> String {
    escape_regex()
        .replace_all(markdown, |caps: &Captures<'_>| match caps.get(1) {
            Some(escaped) => escaped.as_str().to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Markdown rendering of a post for the local archive and Write.as
#[derive(Debug)]
pub struct MarkdownPost<'a> {
    post: &'a TransformedPost,
}

impl<'a> MarkdownPost<'a> {
    pub fn new(post: &'a TransformedPost) -> Self {
        MarkdownPost { post }
    }

    /// File name `{effective_date}_{slug}.md`
    pub fn filename(&self) -> String {
        format!("{}_{}.md", self.post.effective_date, self.post.slug)
    }

    /// Full file content: title, optional feature image, body, hashtags
    pub fn file_content(&self) -> String {
        let title = format!("# {}", self.post.title);
        let mut sections = vec![title.as_str()];
        let rest = self.sections();
        sections.extend(rest.iter().map(String::as_str));
        sections.join("\n\n")
    }

    /// Body sent to Write.as, which renders the title separately
    pub fn publish_body(&self) -> String {
        self.sections().join("\n\n")
    }

    fn sections(&self) -> Vec<String> {
        let mut sections = Vec::with_capacity(3);
        if let Some(url) = &self.post.feature_image {
            sections.push(format!("![Feature image]({})", url));
        }
        sections.push(self.post.body.clone());
        sections.push(hashtag_line(&self.post.tag_names));
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::export::GhostTimestamp;

    fn post(feature_image: Option<&str>, tags: &[&str]) -> TransformedPost {
        TransformedPost {
            title: "Hi".to_string(),
            slug: "hi".to_string(),
            effective_date: GhostTimestamp::Text("2020-01-01".to_string()),
            tag_names: tags.iter().map(|t| t.to_string()).collect(),
            body: "hey".to_string(),
            feature_image: feature_image.map(str::to_string),
            is_page: false,
        }
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        assert_eq!(html_to_markdown("\n\nhello world\n\n"), "hello world");
    }

    #[test]
    fn test_plain_text_keeps_markdown_characters() {
        assert_eq!(html_to_markdown("snake_case_name"), "snake_case_name");
        assert_eq!(html_to_markdown("2*3 = 6"), "2*3 = 6");
        assert_eq!(html_to_markdown("see [1] here"), "see [1] here");
        assert_eq!(html_to_markdown("C:\\temp\\notes"), "C:\\temp\\notes");
        assert_eq!(html_to_markdown("1. first"), "1. first");
        assert_eq!(html_to_markdown("# not a heading"), "# not a heading");
    }

    #[test]
    fn test_code_spans_are_untouched() {
        assert_eq!(
            html_to_markdown(r"<p>Run <code>a\_b</code> now</p>"),
            r"Run `a\_b` now"
        );
    }

    #[test]
    fn test_text_inside_markup_is_unescaped() {
        let md = html_to_markdown("<p>my_var and <strong>x*y</strong></p>");
        assert!(md.contains("my_var"));
        assert!(md.contains("x*y"));
    }

    #[test]
    fn test_links_are_preserved() {
        let md = html_to_markdown(r#"<p>See <a href="https://example.com/a">this page</a>.</p>"#);
        assert!(md.contains("[this page](https://example.com/a)"));
    }

    #[test]
    fn test_long_paragraph_is_not_wrapped() {
        let words = vec!["word"; 60].join(" ");
        let md = html_to_markdown(&format!("<p>{}</p>", words));
        assert_eq!(md.lines().count(), 1);
    }

    #[test]
    fn test_script_is_dropped() {
        let md = html_to_markdown("<p>text</p><script>alert(1)</script>");
        assert!(md.contains("text"));
        assert!(!md.contains("alert"));
    }

    #[test]
    fn test_filename() {
        let p = post(None, &[]);
        assert_eq!(MarkdownPost::new(&p).filename(), "2020-01-01_hi.md");
    }

    #[test]
    fn test_file_content_without_image() {
        let p = post(None, &["tech"]);
        assert_eq!(MarkdownPost::new(&p).file_content(), "# Hi\n\nhey\n\n#tech");
    }

    #[test]
    fn test_file_content_with_image_between_title_and_body() {
        let p = post(Some("http://x/img.png"), &["tech", "rust"]);
        assert_eq!(
            MarkdownPost::new(&p).file_content(),
            "# Hi\n\n![Feature image](http://x/img.png)\n\nhey\n\n#tech #rust"
        );
    }

    #[test]
    fn test_publish_body_omits_title() {
        let p = post(Some("http://x/img.png"), &["tech"]);
        assert_eq!(
            MarkdownPost::new(&p).publish_body(),
            "![Feature image](http://x/img.png)\n\nhey\n\n#tech"
        );
    }

    #[test]
    fn test_empty_tags_leave_trailing_section() {
        let p = post(None, &[]);
        assert_eq!(MarkdownPost::new(&p).file_content(), "# Hi\n\nhey\n\n");
    }
}
