//! Markdown to HTML renderer for Ward documentation pages.
//!
//! This is a small, line oriented renderer for the markdown dialect used by
//! the docs site, not a `CommonMark` implementation. Output carries Tailwind
//! utility classes so it can be injected into the site as-is.
//!
//! # Pipeline
//!
//! 1. Normalize line endings
//! 2. Pull fenced code blocks out into placeholders
//! 3. Escape HTML
//! 4. Headings, horizontal rules and blockquote groups
//! 5. Inline formatting, images and links
//! 6. Strip script/iframe tags and inline event handlers
//! 7. Assemble paragraphs, lists, checklists and tables
//! 8. Link footnotes and append the footnote section
//! 9. Split around code placeholders into [`Fragment`]s
//!
//! Code blocks are returned as structured [`CodeBlock`]s so the caller can
//! hand them to a syntax highlighter.
//!
//! # Example
//!
//! ```
//! use ward_renderer::render;
//!
//! let doc = render("# Title\n\nSome **bold** text.");
//! let html = doc.to_html();
//!
//! assert!(html.contains("<h1"));
//! assert!(html.contains(r#"<strong class="font-bold">bold</strong>"#));
//! ```

mod assembler;
mod code_block;
mod document;
mod footnote;
mod inline;
mod structure;
mod util;

pub use code_block::CodeBlock;
pub use document::{Fragment, RenderedDocument};
pub use util::escape_html;

/// Render markdown into HTML fragments.
///
/// Never fails: unrecognized syntax is kept as escaped text inside a
/// paragraph.
#[must_use]
pub fn render(markdown: &str) -> RenderedDocument {
    let normalized = util::normalize_line_endings(markdown);
    let (text, code_blocks) = code_block::extract(&normalized);
    let escaped = escape_html(&text);
    let structured = structure::process(&escaped);
    let formatted = inline::sanitize(&inline::apply(&structured));
    let (body, footnotes) = footnote::collect(&formatted);
    let assembled = assembler::assemble(&body);
    let html = footnotes.finish(&assembled);
    RenderedDocument::split(&html, code_blocks)
}
