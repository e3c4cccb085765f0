//! Rendered output split around code blocks.

use crate::code_block::{CodeBlock, PLACEHOLDER_RE};
use crate::util::escape_html;

/// A piece of rendered output.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum Fragment {
    /// Rendered HTML.
    Html { html: String },
    /// A code block left for the caller to highlight.
    Code(CodeBlock),
}

/// Result of [`render`](crate::render): HTML fragments interleaved with code
/// blocks in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RenderedDocument {
    fragments: Vec<Fragment>,
}

impl RenderedDocument {
    /// Split `html` at code placeholders.
    ///
    /// Whitespace-only HTML between placeholders is dropped. A placeholder
    /// with no matching block is kept as text.
    pub(crate) fn split(html: &str, code_blocks: Vec<CodeBlock>) -> Self {
        let mut blocks: Vec<Option<CodeBlock>> = code_blocks.into_iter().map(Some).collect();
        let mut fragments = Vec::new();
        let mut pending = String::new();
        let mut last = 0;

        for caps in PLACEHOLDER_RE.captures_iter(html) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let block = caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|idx| blocks.get_mut(idx))
                .and_then(Option::take);

            pending.push_str(&html[last..whole.start()]);
            last = whole.end();
            match block {
                Some(block) => {
                    push_html(&mut fragments, std::mem::take(&mut pending));
                    fragments.push(Fragment::Code(block));
                }
                None => pending.push_str(whole.as_str()),
            }
        }
        pending.push_str(&html[last..]);
        push_html(&mut fragments, pending);

        Self { fragments }
    }

    /// Fragments in document order.
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Code blocks in document order.
    pub fn code_blocks(&self) -> impl Iterator<Item = &CodeBlock> {
        self.fragments.iter().filter_map(|fragment| match fragment {
            Fragment::Code(block) => Some(block),
            Fragment::Html { .. } => None,
        })
    }

    /// Returns `true` if nothing was rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Concatenate all fragments, rendering code blocks as plain
    /// `<pre><code>` elements.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Html { html: part } => html.push_str(part),
                Fragment::Code(block) => {
                    html.push_str(&format!(
                        r#"<pre><code class="language-{}">{}</code></pre>"#,
                        escape_html(&block.lang),
                        escape_html(block.trimmed())
                    ));
                }
            }
        }
        html
    }
}

fn push_html(fragments: &mut Vec<Fragment>, html: String) {
    if !html.trim().is_empty() {
        fragments.push(Fragment::Html { html });
    }
}
