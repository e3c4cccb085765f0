//! Cross-reference resolution.
//!
//! Documentation bodies link to each other with `[(path)]` tokens, where
//! `path` is a file path relative to the documentation root. After a scan has
//! indexed every file, each token is rewritten into an internal link token
//! `[</docs/...>Display Name]` that the renderer turns into a clickable
//! element. References to unknown files become a visible bold marker.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::document::DocFile;

/// Replacement for references that don't resolve to a page.
pub const UNKNOWN_REFERENCE: &str = "**Unknown Reference**";

static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\(([^)]+)\)\]").unwrap());

/// Where a reference points.
#[derive(Clone, Debug, PartialEq, Eq)]
struct LinkTarget {
    path: String,
    name: String,
}

/// Index of every scanned file, keyed by root-relative path.
///
/// Uncategorized files are indexed too but resolve as unknown, since no page
/// exists for them.
#[derive(Debug, Default)]
pub struct FileIndex {
    targets: HashMap<String, Option<LinkTarget>>,
}

impl FileIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a file under its `file_path`.
    ///
    /// Must be called with the file's final parent status, after any
    /// demotion, so links point at the page that actually renders it.
    pub fn insert(&mut self, file: &DocFile) {
        let target = (!file.category.is_empty()).then(|| LinkTarget {
            path: file.link_path(),
            name: file.name.clone(),
        });
        self.targets.insert(file.file_path.clone(), target);
    }

    /// Number of indexed files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` if nothing was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn target(&self, reference: &str) -> Option<&LinkTarget> {
        self.targets.get(reference)?.as_ref()
    }
}

/// Output of [`resolve`].
#[derive(Debug, PartialEq, Eq)]
pub struct Resolved {
    /// Content with every `[(path)]` token replaced.
    pub content: String,
    /// Number of tokens replaced with [`UNKNOWN_REFERENCE`].
    pub unresolved: usize,
}

/// Rewrite `[(path)]` tokens in `content` using `index`.
///
/// Whitespace around the path is ignored.
#[must_use]
pub fn resolve(content: &str, index: &FileIndex) -> Resolved {
    let mut unresolved = 0;
    let content = REFERENCE_RE
        .replace_all(content, |caps: &Captures<'_>| {
            match index.target(caps[1].trim()) {
                Some(target) => format!("[<{}>{}]", target.path, target.name),
                None => {
                    unresolved += 1;
                    UNKNOWN_REFERENCE.to_owned()
                }
            }
        })
        .into_owned();

    Resolved {
        content,
        unresolved,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(file_path: &str, name: &str, category: &str, is_parent: bool) -> DocFile {
        DocFile {
            name: name.to_owned(),
            category: category.to_owned(),
            category_icon: None,
            category_description: None,
            is_parent,
            content: String::new(),
            file_path: file_path.to_owned(),
            file_name: file_path.rsplit('/').next().unwrap().to_owned(),
        }
    }

    fn index() -> FileIndex {
        let mut index = FileIndex::new();
        index.insert(&doc("commands/index.md", "Commands", "commands", true));
        index.insert(&doc("commands/auto mod.md", "Auto Mod", "commands", false));
        index.insert(&doc("notes.md", "notes", "", false));
        index
    }

    #[test]
    fn test_resolve_ordinary_file() {
        let resolved = resolve("See [( commands/auto mod.md )].", &index());

        assert_eq!(resolved.content, "See [</docs/commands/auto-mod>Auto Mod].");
        assert_eq!(resolved.unresolved, 0);
    }

    #[test]
    fn test_resolve_parent_file() {
        let resolved = resolve("[(commands/index.md)]", &index());

        assert_eq!(resolved.content, "[</docs/commands>Commands]");
    }

    #[test]
    fn test_resolve_unknown_reference() {
        let resolved = resolve("Go to [(nonexistent/file)] now", &index());

        assert_eq!(resolved.content, "Go to **Unknown Reference** now");
        assert_eq!(resolved.unresolved, 1);
    }

    #[test]
    fn test_resolve_uncategorized_file_is_unknown() {
        let resolved = resolve("[(notes.md)]", &index());

        assert_eq!(resolved.content, UNKNOWN_REFERENCE);
        assert_eq!(resolved.unresolved, 1);
    }

    #[test]
    fn test_resolve_leaves_other_brackets() {
        let text = "[label](https://example.com) and [x]";
        let resolved = resolve(text, &index());

        assert_eq!(resolved.content, text);
    }

    #[test]
    fn test_index_len() {
        assert_eq!(index().len(), 3);
        assert!(FileIndex::new().is_empty());
    }
}
