//! Footnote definitions, references and the trailing footnote section.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static DEFINITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\^(\w+)\]:[ \t]*(.+)$").unwrap());

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\^(\w+)\]").unwrap());

const LINK_CLASS: &str = "text-[#aac49b] hover:underline";

/// Footnote definitions collected from one document.
#[derive(Debug, Default)]
pub(crate) struct Footnotes {
    /// Ids in first-definition order.
    order: Vec<String>,
    text: HashMap<String, String>,
}

impl Footnotes {
    fn define(&mut self, id: &str, text: &str) {
        if !self.text.contains_key(id) {
            self.order.push(id.to_owned());
        }
        self.text.insert(id.to_owned(), text.to_owned());
    }

    /// Returns `true` if no footnote was defined.
    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Link references to defined footnotes and append the footnote section.
    ///
    /// References without a definition are left as written.
    pub(crate) fn finish(&self, html: &str) -> String {
        let mut html = REFERENCE_RE
            .replace_all(html, |caps: &Captures<'_>| {
                let id = &caps[1];
                if self.text.contains_key(id) {
                    format!(
                        r##"<sup class="text-xs"><a href="#fn-{id}" id="ref-{id}" class="{LINK_CLASS}">{id}</a></sup>"##
                    )
                } else {
                    caps[0].to_owned()
                }
            })
            .into_owned();

        if self.is_empty() {
            return html;
        }

        html.push_str(r#"<hr class="border-white/10 my-8" />"#);
        html.push_str(r#"<div class="footnotes text-sm text-gray-600">"#);
        for id in &self.order {
            let text = &self.text[id];
            html.push_str(&format!(
                r##"<p id="fn-{id}" class="mb-2"><sup>{id}</sup> {text} <a href="#ref-{id}" class="{LINK_CLASS}">↩</a></p>"##
            ));
        }
        html.push_str("</div>");
        html
    }
}

/// Remove footnote definitions from `html`, one per line.
///
/// Text before a definition on the same line is kept. A line that held only
/// a definition becomes blank, so it ends the surrounding paragraph.
pub(crate) fn collect(html: &str) -> (String, Footnotes) {
    let mut footnotes = Footnotes::default();
    let lines: Vec<&str> = html
        .split('\n')
        .map(|line| match DEFINITION_RE.captures(line) {
            Some(caps) => {
                let text = caps[2].trim();
                if !text.is_empty() {
                    footnotes.define(&caps[1], text);
                }
                let start = caps.get(0).map_or(line.len(), |m| m.start());
                line[..start].trim_end()
            }
            None => line,
        })
        .collect();
    (lines.join("\n"), footnotes)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_collect_removes_definitions() {
        let (body, footnotes) = collect("text[^a]\n[^a]: first note\nmore");

        assert_eq!(body, "text[^a]\n\nmore");
        assert_eq!(footnotes.order, vec!["a"]);
        assert_eq!(footnotes.text["a"], "first note");
    }

    #[test]
    fn test_collect_keeps_text_before_definition() {
        let (body, footnotes) = collect("see below [^n]: the note");

        assert_eq!(body, "see below");
        assert!(!footnotes.is_empty());
    }

    #[test]
    fn test_redefinition_keeps_position() {
        let (_, footnotes) = collect("[^a]: one\n[^b]: two\n[^a]: three");

        assert_eq!(footnotes.order, vec!["a", "b"]);
        assert_eq!(footnotes.text["a"], "three");
    }

    #[test]
    fn test_finish_without_definitions_is_identity() {
        let footnotes = Footnotes::default();

        assert_eq!(footnotes.finish("text[^x]"), "text[^x]");
    }

    #[test]
    fn test_finish_links_defined_only() {
        let (_, footnotes) = collect("[^1]: defined");
        let html = footnotes.finish("a[^1] b[^2]");

        assert!(html.starts_with(
            r##"a<sup class="text-xs"><a href="#fn-1" id="ref-1" class="text-[#aac49b] hover:underline">1</a></sup> b[^2]"##
        ));
        assert!(html.ends_with(
            r##"<p id="fn-1" class="mb-2"><sup>1</sup> defined <a href="#ref-1" class="text-[#aac49b] hover:underline">↩</a></p></div>"##
        ));
    }
}
