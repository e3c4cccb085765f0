//! Directory scanner.
//!
//! Walks a [`Storage`] tree, extracts metadata from every markdown file,
//! groups files into categories and resolves cross-references once the whole
//! tree has been indexed.
//!
//! # Ordering
//!
//! Directory entries are visited in name order (as returned by
//! [`Storage::list`]), dot-files included. Categories appear in the
//! order they were first seen. The first parent-flagged file of a category
//! becomes its parent; later ones are demoted to ordinary files.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use ward_storage::{EntryKind, Storage};

use crate::document::{DocCategory, DocFile, ScanResult};
use crate::error::DocsError;
use crate::metadata;
use crate::reference::{self, FileIndex};

const MARKDOWN_EXTENSION: &str = ".md";

/// Convert Duration to milliseconds as f64.
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Category being assembled during a walk.
struct CategorySlot {
    category: DocCategory,
    icon_seen: bool,
}

/// Mutable state of one walk.
#[derive(Default)]
struct ScanState {
    slots: Vec<CategorySlot>,
    by_slug: HashMap<String, usize>,
    index: FileIndex,
    file_count: usize,
    skipped_files: usize,
}

impl ScanState {
    fn slot_index(&mut self, slug: &str) -> usize {
        if let Some(&idx) = self.by_slug.get(slug) {
            return idx;
        }
        let idx = self.slots.len();
        self.slots.push(CategorySlot {
            category: DocCategory::new(slug.to_owned()),
            icon_seen: false,
        });
        self.by_slug.insert(slug.to_owned(), idx);
        idx
    }

    fn add(&mut self, mut file: DocFile) {
        self.file_count += 1;

        if file.category.is_empty() {
            self.index.insert(&file);
            return;
        }

        let idx = self.slot_index(&file.category);
        let slot = &mut self.slots[idx];
        if !slot.icon_seen
            && let Some(icon) = &file.category_icon
        {
            slot.category.icon.clone_from(icon);
            slot.icon_seen = true;
        }
        if slot.category.description.is_none() {
            slot.category.description.clone_from(&file.category_description);
        }

        if file.is_parent && slot.category.parent_file.is_some() {
            tracing::debug!(
                path = %file.file_path,
                category = %file.category,
                "Category already has a parent, treating file as ordinary"
            );
            file.is_parent = false;
        }

        // Index after demotion so links target the page that renders the file.
        self.index.insert(&file);
        let category = &mut self.slots[idx].category;
        if file.is_parent {
            category.parent_file = Some(file);
        } else {
            category.files.push(file);
        }
    }

    fn walk(&mut self, storage: &dyn Storage, dir: &Path, prefix: &str) {
        let entries = match storage.list(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "Failed to list directory");
                return;
            }
        };

        for entry in entries {
            let rel_path = if prefix.is_empty() {
                entry.name.clone()
            } else {
                format!("{prefix}/{}", entry.name)
            };

            match entry.kind {
                EntryKind::Dir => self.walk(storage, Path::new(&rel_path), &rel_path),
                EntryKind::File if entry.name.ends_with(MARKDOWN_EXTENSION) => {
                    match storage.read(Path::new(&rel_path)) {
                        Ok(raw) => self.add(metadata::extract(&raw, &rel_path, &entry.name)),
                        Err(e) => {
                            tracing::warn!(path = %rel_path, error = %e, "Failed to read documentation file");
                            self.skipped_files += 1;
                        }
                    }
                }
                EntryKind::File => {}
            }
        }
    }

    fn finish(self) -> ScanResult {
        let mut unresolved = 0;
        let mut categories = Vec::with_capacity(self.slots.len());

        for slot in self.slots {
            let mut category = slot.category;
            let files = category.parent_file.iter_mut().chain(category.files.iter_mut());
            for file in files {
                let resolved = reference::resolve(&file.content, &self.index);
                unresolved += resolved.unresolved;
                file.content = resolved.content;
            }
            categories.push(category);
        }

        ScanResult::new(categories, self.file_count, self.skipped_files, unresolved)
    }
}

/// Scan the whole documentation tree.
///
/// Unreadable files and subdirectories are logged and skipped.
///
/// # Errors
///
/// Returns [`DocsError::RootNotFound`] if the root directory doesn't exist
/// and [`DocsError::Storage`] if it can't be listed.
pub fn scan(storage: &dyn Storage) -> Result<ScanResult, DocsError> {
    let start = Instant::now();

    if !storage.exists() {
        return Err(DocsError::RootNotFound(storage.root().to_path_buf()));
    }
    // Fail loudly only when the root itself is unreadable.
    storage.list(Path::new(""))?;

    let mut state = ScanState::default();
    state.walk(storage, Path::new(""), "");
    let result = state.finish();

    tracing::info!(
        file_count = result.file_count(),
        category_count = result.len(),
        skipped_files = result.skipped_files(),
        unresolved_references = result.unresolved_references(),
        elapsed_ms = elapsed_ms(start),
        "Documentation scanned"
    );

    Ok(result)
}
