//! Fenced code block extraction.
//!
//! Code fences are removed before any escaping or formatting and replaced by
//! `__CODE_BLOCK_N__` placeholders. The placeholders survive every later pass
//! untouched and are swapped back for structured [`CodeBlock`]s at the end.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[ \t]*(\w+)?[ \t]*\n?(.*?)```").unwrap());

/// Matches a placeholder anywhere in the text.
pub(crate) static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__CODE_BLOCK_(\d+)__").unwrap());

/// Language used when a fence doesn't name one.
const DEFAULT_LANGUAGE: &str = "text";

/// A fenced code block, left raw for a syntax highlighter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CodeBlock {
    /// Language from the opening fence, `text` if absent.
    pub lang: String,
    /// Code exactly as written between the fences.
    pub code: String,
}

impl CodeBlock {
    /// Code without leading blank lines and trailing whitespace.
    ///
    /// Indentation of the first non-blank line is kept.
    #[must_use]
    pub fn trimmed(&self) -> &str {
        let code = self.code.as_str();
        let leading = code.len() - code.trim_start().len();
        let start = code[..leading].rfind('\n').map_or(0, |idx| idx + 1);
        code[start..].trim_end()
    }
}

/// Placeholder text for the block at `index`.
pub(crate) fn placeholder(index: usize) -> String {
    format!("__CODE_BLOCK_{index}__")
}

/// Replace every fenced block in `text` with a placeholder.
pub(crate) fn extract(text: &str) -> (String, Vec<CodeBlock>) {
    let mut blocks = Vec::new();
    let replaced = FENCE_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let lang = caps
                .get(1)
                .map_or(DEFAULT_LANGUAGE, |m| m.as_str())
                .to_owned();
            let code = caps.get(2).map_or("", |m| m.as_str()).to_owned();
            blocks.push(CodeBlock { lang, code });
            placeholder(blocks.len() - 1)
        })
        .into_owned();
    (replaced, blocks)
}
