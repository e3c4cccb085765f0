//! Storage abstraction for the Ward documentation tree.
//!
//! The docs pipeline never touches the filesystem directly. It walks the tree
//! through the [`Storage`] trait, which keeps the scanner testable and lets the
//! scan cache count how often content is actually read.
//!
//! # Architecture
//!
//! - [`Storage`] trait with `exists()`, `list()`, `read()` and `last_modified()`
//! - [`FsStorage`] for a directory on the local filesystem
//! - [`MockStorage`] for tests (behind the `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::{Path, PathBuf};
//! use ward_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("docs"));
//! for entry in storage.list(Path::new(""))? {
//!     println!("{} ({:?})", entry.name, entry.kind);
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind};
