//! Documentation data model.
//!
//! [`DocFile`] is one parsed markdown file, [`DocCategory`] groups files under
//! a slug with at most one parent file, and [`ScanResult`] is the immutable
//! snapshot produced by one scan.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Icon used for categories that never declared one.
pub const DEFAULT_CATEGORY_ICON: &str = "FileText";

/// One documentation file after metadata extraction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocFile {
    /// Display name (`<file:name>` or the file name without `.md`).
    pub name: String,
    /// Category slug, empty when the file is uncategorized.
    pub category: String,
    /// Icon hint from `<file:category icon="...">`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_icon: Option<String>,
    /// Category description declared in this file, consumed by the scanner.
    #[serde(skip)]
    pub category_description: Option<String>,
    /// Whether this file is its category's landing page.
    pub is_parent: bool,
    /// Markdown body after placeholder substitution and reference resolution.
    pub content: String,
    /// Path relative to the documentation root, `/` separated.
    pub file_path: String,
    /// Last path component, including the `.md` extension.
    pub file_name: String,
}

impl DocFile {
    /// URL slug of the file within its category.
    ///
    /// The first directory segment is dropped (it usually names the category
    /// folder), the `.md` extension is removed, and whitespace runs become `-`.
    /// Top-level files keep their whole name.
    #[must_use]
    pub fn slug(&self) -> String {
        link_slug(&self.file_path)
    }

    /// Link target for this file: `/docs/{category}` for parents,
    /// `/docs/{category}/{slug}` otherwise.
    #[must_use]
    pub fn link_path(&self) -> String {
        if self.is_parent {
            format!("/docs/{}", self.category)
        } else {
            format!("/docs/{}/{}", self.category, self.slug())
        }
    }
}

/// Slug for a root-relative file path.
pub(crate) fn link_slug(file_path: &str) -> String {
    let rest = match file_path.split_once('/') {
        Some((_, rest)) if !rest.is_empty() => rest,
        _ => file_path,
    };
    let stem = rest.strip_suffix(".md").unwrap_or(rest);
    normalize_whitespace(stem)
}

/// Replace every run of whitespace with a single `-`.
///
/// Leading and trailing runs are replaced too, not trimmed.
pub(crate) fn normalize_whitespace(value: &str) -> String {
    WHITESPACE_RE.replace_all(value, "-").into_owned()
}

/// Format a category slug for display.
///
/// Splits on `-` and capitalizes each word: `getting-started` becomes
/// `Getting Started`.
#[must_use]
pub fn format_category_name(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A category of documentation files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocCategory {
    /// Category slug.
    pub name: String,
    /// First non-empty icon hint seen for this category.
    pub icon: String,
    /// First non-empty description seen for this category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Landing page of the category.
    pub parent_file: Option<DocFile>,
    /// Ordinary files in traversal order.
    pub files: Vec<DocFile>,
}

impl DocCategory {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            icon: DEFAULT_CATEGORY_ICON.to_owned(),
            description: None,
            parent_file: None,
            files: Vec::new(),
        }
    }

    /// Human readable category name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format_category_name(&self.name)
    }

    /// Parent file first, then ordinary files in traversal order.
    pub fn all_files(&self) -> impl Iterator<Item = &DocFile> {
        self.parent_file.iter().chain(self.files.iter())
    }

    /// Number of files including the parent.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len() + usize::from(self.parent_file.is_some())
    }

    /// Find a file by its exact root-relative path.
    #[must_use]
    pub fn file(&self, file_path: &str) -> Option<&DocFile> {
        self.all_files().find(|f| f.file_path == file_path)
    }

    /// Find a file using tolerant matching.
    ///
    /// `path` may omit the `.md` extension and may use dashes where the file
    /// name has spaces. A file matches when its name equals the normalized
    /// path or its root-relative path ends with any of the candidate forms.
    /// The parent file is checked first.
    #[must_use]
    pub fn find_file(&self, path: &str) -> Option<&DocFile> {
        let with_ext = if path.ends_with(".md") {
            path.to_owned()
        } else {
            format!("{path}.md")
        };
        let with_spaces = with_ext.replace('-', " ");

        self.all_files().find(|f| {
            f.file_name == with_ext
                || f.file_name == with_spaces
                || f.file_path.ends_with(path)
                || f.file_path.ends_with(&with_ext)
                || f.file_path.ends_with(&with_spaces)
        })
    }
}

/// Immutable result of one documentation scan.
///
/// Categories keep first-sight order. Lookups by slug go through an index.
#[derive(Clone, Debug, Default)]
pub struct ScanResult {
    categories: Vec<DocCategory>,
    by_slug: HashMap<String, usize>,
    file_count: usize,
    skipped_files: usize,
    unresolved_references: usize,
}

impl ScanResult {
    pub(crate) fn new(
        categories: Vec<DocCategory>,
        file_count: usize,
        skipped_files: usize,
        unresolved_references: usize,
    ) -> Self {
        let by_slug = categories
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.name.clone(), idx))
            .collect();
        Self {
            categories,
            by_slug,
            file_count,
            skipped_files,
            unresolved_references,
        }
    }

    /// Look up a category by slug.
    #[must_use]
    pub fn category(&self, slug: &str) -> Option<&DocCategory> {
        self.by_slug.get(slug).map(|&idx| &self.categories[idx])
    }

    /// All categories in first-sight order.
    #[must_use]
    pub fn categories(&self) -> &[DocCategory] {
        &self.categories
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns `true` if no category was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of markdown files parsed, including uncategorized ones.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Number of markdown files that could not be read.
    #[must_use]
    pub fn skipped_files(&self) -> usize {
        self.skipped_files
    }

    /// Number of `[(path)]` references replaced with the unknown marker.
    #[must_use]
    pub fn unresolved_references(&self) -> usize {
        self.unresolved_references
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(file_path: &str, is_parent: bool) -> DocFile {
        let file_name = file_path.rsplit('/').next().unwrap().to_owned();
        DocFile {
            name: file_name.trim_end_matches(".md").to_owned(),
            category: "commands".to_owned(),
            category_icon: None,
            category_description: None,
            is_parent,
            content: String::new(),
            file_path: file_path.to_owned(),
            file_name,
        }
    }

    #[test]
    fn test_format_category_name() {
        assert_eq!(format_category_name("getting-started"), "Getting Started");
        assert_eq!(format_category_name("FAQ"), "Faq");
        assert_eq!(format_category_name("commands"), "Commands");
    }

    #[test]
    fn test_slug_drops_first_segment() {
        assert_eq!(doc("commands/auto mod.md", false).slug(), "auto-mod");
        assert_eq!(doc("commands/admin/ban.md", false).slug(), "admin/ban");
    }

    #[test]
    fn test_normalize_whitespace_keeps_edges() {
        assert_eq!(normalize_whitespace("moderation  tools"), "moderation-tools");
        assert_eq!(normalize_whitespace(" x "), "-x-");
        assert_eq!(normalize_whitespace("a\t\nb"), "a-b");
    }

    #[test]
    fn test_slug_top_level_file() {
        assert_eq!(doc("intro.md", false).slug(), "intro");
    }

    #[test]
    fn test_link_path() {
        assert_eq!(doc("commands/ban.md", false).link_path(), "/docs/commands/ban");
        assert_eq!(doc("commands/index.md", true).link_path(), "/docs/commands");
    }

    #[test]
    fn test_all_files_parent_first() {
        let mut category = DocCategory::new("commands".to_owned());
        category.files.push(doc("commands/ban.md", false));
        category.parent_file = Some(doc("commands/index.md", true));

        let paths: Vec<_> = category.all_files().map(|f| f.file_path.as_str()).collect();

        assert_eq!(paths, vec!["commands/index.md", "commands/ban.md"]);
        assert_eq!(category.file_count(), 2);
    }

    #[test]
    fn test_find_file_tolerant() {
        let mut category = DocCategory::new("commands".to_owned());
        category.files.push(doc("commands/auto mod.md", false));
        category.files.push(doc("commands/ban.md", false));

        assert_eq!(
            category.find_file("auto-mod").map(|f| f.file_path.as_str()),
            Some("commands/auto mod.md")
        );
        assert_eq!(
            category.find_file("ban.md").map(|f| f.file_path.as_str()),
            Some("commands/ban.md")
        );
        assert_eq!(
            category.find_file("commands/ban").map(|f| f.file_path.as_str()),
            Some("commands/ban.md")
        );
        assert!(category.find_file("kick").is_none());
    }

    #[test]
    fn test_file_exact_match() {
        let mut category = DocCategory::new("commands".to_owned());
        category.files.push(doc("commands/ban.md", false));

        assert!(category.file("commands/ban.md").is_some());
        assert!(category.file("ban").is_none());
    }

    #[test]
    fn test_scan_result_lookup_keeps_order() {
        let result = ScanResult::new(
            vec![
                DocCategory::new("zeta".to_owned()),
                DocCategory::new("alpha".to_owned()),
            ],
            0,
            0,
            0,
        );

        let names: Vec<_> = result.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(result.category("alpha").map(|c| c.name.as_str()), Some("alpha"));
        assert!(result.category("missing").is_none());
    }

    #[test]
    fn test_doc_file_serializes_camel_case() {
        let mut file = doc("commands/ban.md", false);
        file.category_description = Some("hidden".to_owned());

        let json = serde_json::to_value(&file).unwrap();

        assert_eq!(json["filePath"], "commands/ban.md");
        assert_eq!(json["isParent"], false);
        assert!(json.get("categoryDescription").is_none());
        assert!(json.get("categoryIcon").is_none());
    }
}
