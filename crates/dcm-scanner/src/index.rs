//! The ordered directory-to-files map built once per scan.
//!
//! A [`DirectoryIndex`] is materialized by the
//! [`DirectoryIndexer`](crate::DirectoryIndexer) and then replayed twice by
//! the coordinator: a counting pass that fixes the progress bounds, and a
//! visiting pass that feeds every file to the classifier. Both passes
//! enumerate this one structure, so they see exactly the same file set in
//! the same relative order.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};

/// Control flow returned by a [`DirectoryIndex::walk`] visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkFlow {
    /// Keep visiting the remaining files.
    Continue,
    /// Abort the walk immediately, skipping all remaining files.
    Stop,
}

/// An ordered map from directory path to the regular files directly inside it.
///
/// # Invariants
///
/// - Directory keys iterate in lexicographic path order
/// - The scan root is always present, even when unreadable (empty file list)
/// - File lists hold only regular files, in the enumeration order the
///   builder produced (stable within one process)
///
/// # Examples
///
/// ```
/// use dcm_scanner::DirectoryIndex;
/// use camino::{Utf8Path, Utf8PathBuf};
///
/// let mut index = DirectoryIndex::new();
/// index.insert_dir(Utf8Path::new("/data"));
/// index.add_file(Utf8Path::new("/data"), Utf8PathBuf::from("/data/a.dcm"));
///
/// assert_eq!(index.directory_count(), 1);
/// assert_eq!(index.file_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryIndex {
    /// Directory -> files, ordered lexicographically by directory path.
    dirs: BTreeMap<Utf8PathBuf, Vec<Utf8PathBuf>>,
}

impl DirectoryIndex {
    /// Creates an empty index.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a directory, keeping any files already recorded for it.
    pub fn insert_dir(&mut self, dir: &Utf8Path) {
        self.dirs.entry(dir.to_owned()).or_default();
    }

    /// Appends a regular file to its directory's list.
    ///
    /// The directory key is created if it was not recorded yet.
    pub fn add_file(&mut self, dir: &Utf8Path, file: Utf8PathBuf) {
        self.dirs.entry(dir.to_owned()).or_default().push(file);
    }

    /// Returns `true` if the given directory was recorded.
    #[must_use]
    pub fn contains_dir(&self, dir: &Utf8Path) -> bool {
        self.dirs.contains_key(dir)
    }

    /// Returns the files recorded for a directory.
    #[must_use]
    pub fn files(&self, dir: &Utf8Path) -> Option<&[Utf8PathBuf]> {
        self.dirs.get(dir).map(Vec::as_slice)
    }

    /// Returns the number of directories recorded.
    #[inline]
    #[must_use]
    pub fn directory_count(&self) -> usize {
        self.dirs.len()
    }

    /// Returns the total number of files across all directories.
    ///
    /// This is the counting pass: the value becomes the progress maximum
    /// consumed by the visiting pass.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.dirs.values().map(Vec::len).sum()
    }

    /// Returns `true` if no directory was recorded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Iterates over `(directory, files)` pairs in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (&Utf8Path, &[Utf8PathBuf])> {
        self.dirs
            .iter()
            .map(|(dir, files)| (dir.as_path(), files.as_slice()))
    }

    /// Replays the index through a visitor, one call per file.
    ///
    /// Directories are visited in lexicographic order, files within each
    /// directory in index order. A [`WalkFlow::Stop`] result aborts the
    /// remaining walk immediately.
    ///
    /// Returns `true` if every file was visited, `false` if the visitor
    /// stopped early.
    pub fn walk<F>(&self, mut visit: F) -> bool
    where
        F: FnMut(&Utf8Path, &Utf8Path) -> WalkFlow,
    {
        for (dir, files) in &self.dirs {
            for file in files {
                if visit(dir, file) == WalkFlow::Stop {
                    return false;
                }
            }
        }
        true
    }
}
