//! Inline formatting and output sanitizing.
//!
//! Patterns run over the whole escaped document in a fixed order. Double
//! character forms (`~~`, `**`) run before their single character
//! counterparts so the shorter patterns can't split them.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static STRIKETHROUGH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~(.+?)~~").unwrap());
static HIGHLIGHT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"==(.+?)==").unwrap());
static SUBSCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~(.+?)~").unwrap());
/// Brackets are excluded so `[^1] ... [^2]` footnote markers stay intact.
static SUPERSCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^([^\^\n\[\]]+)\^").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
/// The opening `*` must touch text, so `* item` list markers are left alone.
static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\s][^*\n]*?)\*").unwrap());
static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());
static INTERNAL_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\s*&lt;/([^\]]+?)&gt;([^\]]*)\]").unwrap());
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\((\S+?)(?:\s+&quot;(.+?)&quot;)?\)").unwrap()
});
static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]+)`").unwrap());

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?>.*?</script>").unwrap());
static IFRAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<iframe.*?>.*?</iframe>").unwrap());
static EVENT_HANDLER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bon\w+="[^"]*""#).unwrap());

const LINK_CLASS: &str = "text-[#aac49b] hover:underline";

/// Apply inline formatting in order: strikethrough, highlight, subscript,
/// superscript, bold, italic, images, internal links, links, inline code.
pub(crate) fn apply(text: &str) -> String {
    let text = STRIKETHROUGH_RE.replace_all(text, r#"<del class="line-through">$1</del>"#);
    let text = HIGHLIGHT_RE.replace_all(&text, r#"<mark class="bg-yellow-200 px-1">$1</mark>"#);
    let text = SUBSCRIPT_RE.replace_all(&text, r#"<sub class="text-xs">$1</sub>"#);
    let text = SUPERSCRIPT_RE.replace_all(&text, r#"<sup class="text-xs">$1</sup>"#);
    let text = BOLD_RE.replace_all(&text, r#"<strong class="font-bold">$1</strong>"#);
    let text = ITALIC_RE.replace_all(&text, r#"<em class="italic">$1</em>"#);
    let text = IMAGE_RE.replace_all(
        &text,
        r#"<img src="$2" alt="$1" class="my-4 rounded-lg max-w-full" />"#,
    );
    let text = INTERNAL_LINK_RE.replace_all(
        &text,
        r#"<span data-internal-link="/$1" class="internal-link text-[#aac49b] hover:underline cursor-pointer">$2</span>"#,
    );
    let text = LINK_RE.replace_all(&text, |caps: &Captures<'_>| {
        let title = caps
            .get(3)
            .map(|t| format!(r#" title="{}""#, t.as_str()))
            .unwrap_or_default();
        format!(
            r#"<a href="{}" class="{LINK_CLASS}"{title}>{}</a>"#,
            &caps[2], &caps[1]
        )
    });
    let text = INLINE_CODE_RE.replace_all(
        &text,
        r#"<code class="bg-gray-200 text-gray-800 px-2 py-1 rounded">$1</code>"#,
    );
    text.into_owned()
}

/// Remove `<script>` and `<iframe>` elements and `on*="..."` attributes.
pub(crate) fn sanitize(html: &str) -> String {
    let html = SCRIPT_RE.replace_all(html, "");
    let html = IFRAME_RE.replace_all(&html, "");
    let html = EVENT_HANDLER_RE.replace_all(&html, "");
    html.into_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_emphasis_forms() {
        assert_eq!(
            apply("~~old~~ ==new== H~2~O x^2^"),
            concat!(
                r#"<del class="line-through">old</del> "#,
                r#"<mark class="bg-yellow-200 px-1">new</mark> "#,
                r#"H<sub class="text-xs">2</sub>O "#,
                r#"x<sup class="text-xs">2</sup>"#,
            )
        );
    }

    #[test]
    fn test_bold_before_italic() {
        assert_eq!(
            apply("**strong** and *soft*"),
            r#"<strong class="font-bold">strong</strong> and <em class="italic">soft</em>"#
        );
    }

    #[test]
    fn test_list_marker_not_italic() {
        assert_eq!(apply("* item one\n* item two"), "* item one\n* item two");
        assert_eq!(
            apply("* item *soft*"),
            r#"* item <em class="italic">soft</em>"#
        );
    }

    #[test]
    fn test_footnote_markers_not_superscript() {
        assert_eq!(apply("a[^1] and b[^2]"), "a[^1] and b[^2]");
    }

    #[test]
    fn test_image() {
        assert_eq!(
            apply("![Logo](/logo.png)"),
            r#"<img src="/logo.png" alt="Logo" class="my-4 rounded-lg max-w-full" />"#
        );
    }

    #[test]
    fn test_link_with_escaped_title() {
        assert_eq!(
            apply("[Docs](https://example.com &quot;Read more&quot;)"),
            r#"<a href="https://example.com" class="text-[#aac49b] hover:underline" title="Read more">Docs</a>"#
        );
    }

    #[test]
    fn test_link_without_title() {
        assert_eq!(
            apply("[Invite](https://example.com/invite)"),
            r#"<a href="https://example.com/invite" class="text-[#aac49b] hover:underline">Invite</a>"#
        );
    }

    #[test]
    fn test_internal_link() {
        assert_eq!(
            apply("[&lt;/docs/setup&gt;Setup]"),
            r#"<span data-internal-link="/docs/setup" class="internal-link text-[#aac49b] hover:underline cursor-pointer">Setup</span>"#
        );
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(
            apply("run `/warn`"),
            r#"run <code class="bg-gray-200 text-gray-800 px-2 py-1 rounded">/warn</code>"#
        );
    }

    #[test]
    fn test_sanitize_removes_scripts_and_handlers() {
        let html = r#"<p onclick="steal()">a</p><SCRIPT src="x">evil()</script><iframe src="y"></iframe>"#;

        assert_eq!(sanitize(html), "<p >a</p>");
    }
}
