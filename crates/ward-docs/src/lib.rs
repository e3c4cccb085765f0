//! Documentation content pipeline for Ward.
//!
//! This crate provides:
//! - [`metadata::extract`]: parses the `<file>` / `<content>` tag dialect of one markdown file
//! - [`reference::resolve`]: rewrites `[(path)]` cross-references into internal links
//! - [`scanner::scan`]: walks a [`Storage`](ward_storage::Storage) tree into categories
//! - [`ScanCache`]: time and modification based cache for scan results
//! - [`DocsLibrary`]: the lookup facade used by the server and CLI
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use ward_docs::{DocsLibrary, LibraryConfig};
//! use ward_storage::FsStorage;
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("docs")));
//! let library = DocsLibrary::new(storage, LibraryConfig::default());
//!
//! for category in library.categories(true)? {
//!     println!("{} ({} files)", category.display_name(), category.files.len());
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod document;
mod error;
mod library;
pub mod metadata;
pub mod reference;
pub mod scanner;

pub use cache::{Clock, DEFAULT_TTL, ManualClock, ScanCache, SystemClock};
pub use document::{DEFAULT_CATEGORY_ICON, DocCategory, DocFile, ScanResult, format_category_name};
pub use error::DocsError;
pub use library::{DocsLibrary, LibraryConfig};
pub use metadata::Placeholder;
