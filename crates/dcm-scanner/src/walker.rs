//! Directory traversal that materializes a [`DirectoryIndex`].
//!
//! This module provides [`DirectoryIndexer`], a depth-first walker built on
//! `walkdir`. The permissiveness policy is deliberate: a root that is not a
//! readable directory produces an empty index, and unreadable subtrees are
//! recorded with empty file lists and skipped. Neither case is an error.

use std::sync::atomic::{AtomicBool, Ordering};

use camino::Utf8Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::index::DirectoryIndex;

/// A walker that builds the ordered directory-to-files map for one scan.
///
/// # Cancellation
///
/// [`build`](Self::build) polls the supplied stop flag on every entry;
/// once set, the walk stops descending and the index is returned in
/// whatever partial state it reached. There is no rollback.
///
/// # Examples
///
/// ```no_run
/// use std::sync::atomic::AtomicBool;
/// use dcm_scanner::DirectoryIndexer;
/// use camino::Utf8Path;
///
/// let stop = AtomicBool::new(false);
/// let index = DirectoryIndexer::new(true).build(Utf8Path::new("/data"), &stop);
/// println!("{} files", index.file_count());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DirectoryIndexer {
    /// Whether to descend into subdirectories.
    recurse: bool,
    /// Whether to follow symbolic links.
    follow_links: bool,
}

impl DirectoryIndexer {
    /// Creates an indexer.
    ///
    /// # Arguments
    ///
    /// * `recurse` - Whether to descend into subdirectories
    #[must_use]
    pub const fn new(recurse: bool) -> Self {
        Self {
            recurse,
            follow_links: false,
        }
    }

    /// Configures whether to follow symbolic links (off by default).
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Walks `root` depth-first and returns the resulting index.
    ///
    /// - A root that is not a directory yields an empty index (logged at
    ///   `warn`, never an error)
    /// - A readable root is always present in the index, even when every
    ///   entry below it fails to read
    /// - Unreadable subdirectories are recorded with empty file lists and
    ///   traversal into them is skipped
    /// - Non-UTF-8 paths are skipped with a warning
    /// - Entries are enumerated sorted by file name, so re-walking the same
    ///   unchanged tree within one process yields an identical index
    pub fn build(&self, root: &Utf8Path, stop: &AtomicBool) -> DirectoryIndex {
        let mut index = DirectoryIndex::new();

        if !root.is_dir() {
            warn!(root = %root, "scan root is not a readable directory, producing empty index");
            return index;
        }

        // The root key must exist even if reading its contents fails below.
        index.insert_dir(root);

        let mut walker = WalkDir::new(root)
            .follow_links(self.follow_links)
            .sort_by_file_name();
        if !self.recurse {
            walker = walker.max_depth(1);
        }

        for entry in walker {
            if stop.load(Ordering::Relaxed) {
                debug!(root = %root, "walk cancelled, returning partial index");
                break;
            }

            match entry {
                Ok(entry) => {
                    let Some(path) = Utf8Path::from_path(entry.path()) else {
                        warn!(path = %entry.path().display(), "skipping non-UTF-8 path");
                        continue;
                    };

                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        index.insert_dir(path);
                    } else if file_type.is_file() {
                        if let Some(parent) = path.parent() {
                            index.add_file(parent, path.to_owned());
                        }
                    }
                    // Symlinks (when not followed) and special files are ignored.
                }
                Err(err) => {
                    // An unreadable directory still gets its (empty) entry;
                    // the walk continues past it.
                    if let Some(path) = err.path().and_then(Utf8Path::from_path) {
                        index.insert_dir(path);
                    }
                    warn!(error = %err, "failed to read directory entry, skipping subtree");
                }
            }
        }

        index
    }
}
