//! Metadata extraction for annotated markdown files.
//!
//! A documentation file may start with a `<file>` block describing where it
//! belongs, and wrap its body in `<content>` tags:
//!
//! ```text
//! <file>
//!   <file:name val="Ban Command">
//!   <file:category isParent="false" val="moderation" icon="Shield">
//! </file>
//! <category:description>Keep your server clean.</category:description>
//! <content>
//! # {{file.name}}
//! ...
//! </content>
//! ```
//!
//! Extraction never fails. Missing or malformed tags fall back to defaults:
//! no category, not a parent, display name taken from the file name.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::document::{DocFile, normalize_whitespace};

static FILE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<file>(.*?)</file>").unwrap());

static NAME_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<file:name\b((?:[^>"]|"[^"]*")*)>"#).unwrap());

static CATEGORY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<file:category\b((?:[^>"]|"[^"]*")*)>"#).unwrap());

static ATTRIBUTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+)="([^"]*)""#).unwrap());

static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<category:description>(.*?)</category:description>").unwrap()
});

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").unwrap());

const CONTENT_OPEN: &str = "<content>";
const CONTENT_CLOSE: &str = "</content>";

/// Supported `{{...}}` placeholder keys.
///
/// Unknown keys are not an error; they are left in the text verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// `{{file.name}}`: the file's display name.
    FileName,
}

impl Placeholder {
    const ALL: [Self; 1] = [Self::FileName];

    /// Parse a placeholder key, ignoring surrounding whitespace.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL.into_iter().find(|placeholder| placeholder.key() == key)
    }

    /// Key as written inside the braces.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::FileName => "file.name",
        }
    }

    fn value(self, file: &DocFile) -> &str {
        match self {
            Self::FileName => &file.name,
        }
    }
}

/// Parse one raw markdown file into a [`DocFile`].
///
/// # Arguments
///
/// * `raw` - Full file text
/// * `file_path` - Path relative to the documentation root (`/` separated)
/// * `file_name` - Last path component, including `.md`
#[must_use]
pub fn extract(raw: &str, file_path: &str, file_name: &str) -> DocFile {
    let mut file = DocFile {
        name: file_name.strip_suffix(".md").unwrap_or(file_name).to_owned(),
        category: String::new(),
        category_icon: None,
        category_description: None,
        is_parent: false,
        content: String::new(),
        file_path: file_path.to_owned(),
        file_name: file_name.to_owned(),
    };

    let file_block = FILE_BLOCK_RE.captures(raw).and_then(|c| c.get(1));
    if let Some(block) = file_block {
        apply_file_block(&mut file, block.as_str());
    }

    file.category_description = DESCRIPTION_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|d| !d.is_empty())
        .map(str::to_owned);

    // Files without a `<file>` block are plain markdown, used as-is.
    let body = if file_block.is_some() {
        content_body(raw).unwrap_or(raw)
    } else {
        raw
    };
    file.content = substitute_placeholders(body, &file).into_owned();
    file
}

/// Apply `<file:name>` and `<file:category>` tags found in a `<file>` block.
fn apply_file_block(file: &mut DocFile, block: &str) {
    if let Some(attrs) = NAME_TAG_RE.captures(block).map(|c| attributes(&c))
        && let Some(name) = attrs.get("val").filter(|v| !v.is_empty())
    {
        file.name = (*name).to_owned();
    }

    let Some(attrs) = CATEGORY_TAG_RE.captures(block).map(|c| attributes(&c)) else {
        return;
    };
    let Some(slug) = attrs
        .get("val")
        .map(|v| normalize_whitespace(v))
        .filter(|s| !s.is_empty())
    else {
        return;
    };

    file.category = slug;
    file.is_parent = attrs.get("isParent").is_some_and(|v| *v == "true");
    file.category_icon = attrs
        .get("icon")
        .filter(|v| !v.is_empty())
        .map(|v| (*v).to_owned());
}

/// Collect `key="value"` pairs from a tag's attribute section.
fn attributes<'a>(tag: &Captures<'a>) -> HashMap<&'a str, &'a str> {
    let Some(section) = tag.get(1) else {
        return HashMap::new();
    };
    ATTRIBUTE_RE
        .captures_iter(section.as_str())
        .filter_map(|c| Some((c.get(1)?.as_str(), c.get(2)?.as_str())))
        .collect()
}

/// Body between the first `<content>` and the last `</content>`, trimmed.
fn content_body(raw: &str) -> Option<&str> {
    let start = raw.find(CONTENT_OPEN)?;
    let end = raw.rfind(CONTENT_CLOSE)?;
    let inner_start = start + CONTENT_OPEN.len();
    (end >= inner_start).then(|| raw[inner_start..end].trim())
}

/// Replace supported `{{...}}` placeholders with values from `file`.
pub(crate) fn substitute_placeholders<'a>(text: &'a str, file: &DocFile) -> Cow<'a, str> {
    PLACEHOLDER_RE.replace_all(text, |caps: &Captures<'_>| {
        match Placeholder::parse(&caps[1]) {
            Some(placeholder) => placeholder.value(file).to_owned(),
            None => caps[0].to_owned(),
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const FULL: &str = r#"<file>
  <file:name val="Ban Command">
  <file:category isParent="false" val="moderation tools" icon="Shield">
</file>
<category:description>
  Keep your server clean.
</category:description>
<content>
# {{file.name}}

Bans a member.
</content>"#;

    #[test]
    fn test_extract_full_file() {
        let file = extract(FULL, "moderation/ban.md", "ban.md");

        assert_eq!(file.name, "Ban Command");
        assert_eq!(file.category, "moderation-tools");
        assert_eq!(file.category_icon.as_deref(), Some("Shield"));
        assert_eq!(
            file.category_description.as_deref(),
            Some("Keep your server clean.")
        );
        assert!(!file.is_parent);
        assert_eq!(file.content, "# Ban Command\n\nBans a member.");
        assert_eq!(file.file_path, "moderation/ban.md");
        assert_eq!(file.file_name, "ban.md");
    }

    #[test]
    fn test_extract_without_file_block() {
        let raw = "# Notes\n\n<content>kept wrapper</content>";
        let file = extract(raw, "notes.md", "notes.md");

        assert_eq!(file.name, "notes");
        assert!(file.category.is_empty());
        assert!(!file.is_parent);
        assert!(file.category_icon.is_none());
        assert_eq!(file.content, raw);
    }

    #[test]
    fn test_extract_without_content_tags_keeps_raw_text() {
        let raw = "<file><file:category val=\"faq\"></file>\nQuestion?";
        let file = extract(raw, "faq/q.md", "q.md");

        assert_eq!(file.category, "faq");
        assert_eq!(file.content, raw);
    }

    #[test]
    fn test_extract_parent_flag() {
        let raw = r#"<file><file:category isParent="true" val="commands"></file>"#;
        let file = extract(raw, "commands/index.md", "index.md");

        assert!(file.is_parent);
        assert!(file.category_icon.is_none());
    }

    #[test]
    fn test_extract_attributes_in_any_order() {
        let raw = r#"<file><file:category icon="Bot" val="setup" isParent="true" /></file>"#;
        let file = extract(raw, "setup/index.md", "index.md");

        assert_eq!(file.category, "setup");
        assert_eq!(file.category_icon.as_deref(), Some("Bot"));
        assert!(file.is_parent);
    }

    #[test]
    fn test_extract_category_without_val_is_uncategorized() {
        let raw = r#"<file><file:category isParent="true" icon="Bot"></file>"#;
        let file = extract(raw, "setup/index.md", "index.md");

        assert!(file.category.is_empty());
        assert!(!file.is_parent);
    }

    #[test]
    fn test_extract_quoted_values_may_contain_angle_brackets() {
        let raw = r#"<file>
  <file:name val="Settings > Logging">
  <file:category val="setup <advanced>" icon="Cog">
</file>
<content>body</content>"#;
        let file = extract(raw, "setup/logging.md", "logging.md");

        assert_eq!(file.name, "Settings > Logging");
        assert_eq!(file.category, "setup-<advanced>");
        assert_eq!(file.category_icon.as_deref(), Some("Cog"));
        assert_eq!(file.content, "body");
    }

    #[test]
    fn test_extract_empty_name_keeps_default() {
        let raw = r#"<file><file:name val=""></file>"#;
        let file = extract(raw, "guide.md", "guide.md");

        assert_eq!(file.name, "guide");
    }

    #[test]
    fn test_extract_content_uses_last_closing_tag() {
        let raw = "<file></file><content>a <content>b</content> c</content>";
        let file = extract(raw, "x.md", "x.md");

        assert_eq!(file.content, "a <content>b</content> c");
    }

    #[test]
    fn test_extract_content_close_before_open() {
        let raw = "<file></file></content> body <content>";
        let file = extract(raw, "x.md", "x.md");

        assert_eq!(file.content, raw);
    }

    #[test]
    fn test_extract_empty_description_is_absent() {
        let raw = "<category:description>   </category:description>";
        let file = extract(raw, "x.md", "x.md");

        assert!(file.category_description.is_none());
    }

    #[test]
    fn test_unknown_placeholder_left_verbatim() {
        let raw = "<file></file><content>{{ file.name }} by {{author}}</content>";
        let file = extract(raw, "docs/intro.md", "intro.md");

        assert_eq!(file.content, "intro by {{author}}");
    }

    #[test]
    fn test_placeholder_substitution_is_idempotent() {
        let first = extract(FULL, "moderation/ban.md", "ban.md");
        let again = substitute_placeholders(&first.content, &first);

        assert_eq!(again, first.content);
        assert!(!again.contains("{{file.name}}"));
    }

    #[test]
    fn test_placeholder_parse() {
        assert_eq!(Placeholder::parse(" file.name "), Some(Placeholder::FileName));
        assert_eq!(Placeholder::parse("file.path"), None);
        assert_eq!(Placeholder::FileName.key(), "file.name");
    }
}
