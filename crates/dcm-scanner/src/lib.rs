//! Cancellable directory scanning with pluggable per-file classification.
//!
//! This crate provides the scan pipeline: a [`DirectoryIndexer`] walks a
//! root into an ordered [`DirectoryIndex`], and a [`PathScanner`] replays
//! the index through an [`ItemClassifier`], dispatching every classified
//! item to registered [`ScanContext`]s while driving an observable
//! [`Progress`] monitor. Cancellation is cooperative: any thread holding
//! the progress monitor can request it, and the scan honors it at the next
//! file boundary.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use dcm_scanner::{ClassifyError, ItemClassifier, PathScanner, ScanConfig};
//!
//! struct DcmExtension;
//!
//! impl ItemClassifier for DcmExtension {
//!     type Item = String;
//!
//!     fn classify(&self, path: &Utf8Path) -> Result<Option<String>, ClassifyError> {
//!         Ok((path.extension() == Some("dcm")).then(|| path.to_string()))
//!     }
//! }
//!
//! # fn main() -> Result<(), dcm_scanner::ScanError> {
//! let mut scanner = PathScanner::new(ScanConfig::new("/data/incoming"), DcmExtension);
//! let report = scanner.scan()?;
//! println!("{} items in {} files", report.items, report.files);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod channel;
pub mod context;
pub mod error;
pub mod index;
pub mod progress;
pub mod walker;

pub use channel::{ChannelContext, ScanUpdate};
pub use context::{ContextId, ItemClassifier, ScanContext, SharedContext, shared_context};
pub use error::{ClassifyError, ScanError};
pub use index::{DirectoryIndex, WalkFlow};
pub use progress::{
    ListenerId, NullProgress, Progress, ProgressEvent, ProgressField, ProgressListener,
    ProgressMonitor, ProgressValue,
};
pub use walker::DirectoryIndexer;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use camino::Utf8PathBuf;
use tracing::{debug, info, warn};

/// Configuration for one [`PathScanner`].
///
/// # Examples
///
/// ```
/// use dcm_scanner::ScanConfig;
///
/// let config = ScanConfig::new("/data/incoming")
///     .with_recurse(false)
///     .with_follow_links(true);
/// assert!(!config.recurse);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// The directory to scan.
    pub root: Utf8PathBuf,
    /// Whether to descend into subdirectories (on by default).
    pub recurse: bool,
    /// Whether to follow symbolic links (off by default).
    pub follow_links: bool,
}

impl ScanConfig {
    /// Creates a configuration for the given root with default options.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            recurse: true,
            follow_links: false,
        }
    }

    /// Sets whether to descend into subdirectories.
    #[must_use]
    pub const fn with_recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    /// Sets whether to follow symbolic links.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }
}

/// Summary of one completed (or cancelled) scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Directories recorded in the index.
    pub directories: usize,
    /// Files enumerated by the counting pass.
    pub files: usize,
    /// Files the classifier recognized as items.
    pub items: usize,
    /// Files that were not items, including malformed ones.
    pub skipped: usize,
    /// `true` if the scan was cut short by a cancellation request.
    pub cancelled: bool,
    /// Recoverable per-file classification errors, in visit order.
    pub errors: Vec<(Utf8PathBuf, ClassifyError)>,
}

/// The scan coordinator.
///
/// Owns the configuration, the classifier, and the registered contexts, and
/// runs the two-pass scan: build the index, fix the progress bounds from
/// the file count, then visit every file in order.
///
/// `scan` takes `&mut self`, so one scanner cannot run two scans
/// concurrently; clone-free sharing of results happens through
/// [`SharedContext`] handles instead.
pub struct PathScanner<C: ItemClassifier> {
    config: ScanConfig,
    classifier: C,
    /// Registration order is dispatch order.
    contexts: Vec<(ContextId, SharedContext<C::Item>)>,
    next_context_id: u64,
}

impl<C: ItemClassifier> std::fmt::Debug for PathScanner<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathScanner")
            .field("config", &self.config)
            .field("contexts", &self.contexts.len())
            .finish_non_exhaustive()
    }
}

impl<C: ItemClassifier> PathScanner<C> {
    /// Creates a scanner for the given configuration and classifier.
    pub fn new(config: ScanConfig, classifier: C) -> Self {
        Self {
            config,
            classifier,
            contexts: Vec::new(),
            next_context_id: 1,
        }
    }

    /// Returns the scan configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Returns the classifier.
    #[inline]
    pub const fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Registers a context; it receives lifecycle notifications for every
    /// subsequent scan, in registration order.
    pub fn register_context(&mut self, context: SharedContext<C::Item>) -> ContextId {
        let id = ContextId(self.next_context_id);
        self.next_context_id += 1;
        self.contexts.push((id, context));
        id
    }

    /// Removes a context; returns `true` if it was registered.
    pub fn unregister_context(&mut self, id: ContextId) -> bool {
        let before = self.contexts.len();
        self.contexts.retain(|(context_id, _)| *context_id != id);
        self.contexts.len() != before
    }

    /// Returns the number of registered contexts.
    #[inline]
    #[must_use]
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Runs a scan with a fresh cancellable progress monitor.
    ///
    /// Use [`scan_with_progress`](Self::scan_with_progress) to observe or
    /// cancel the scan from another thread.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Classifier`] when the classifier fails fatally.
    pub fn scan(&mut self) -> Result<ScanReport, ScanError> {
        let progress = ProgressMonitor::cancellable();
        self.scan_with_progress(&progress)
    }

    /// Runs a scan driven through the supplied progress monitor.
    ///
    /// The scan sequence:
    ///
    /// 1. An invalid or unreadable root short-circuits to an empty report;
    ///    contexts are not notified at all
    /// 2. The index is built (progress indeterminate)
    /// 3. The counting pass fixes the progress bounds to `[0, files]`
    /// 4. Contexts receive the start notification in registration order
    /// 5. Every file is visited in index order; classified items are
    ///    dispatched to all contexts before the next file is touched
    /// 6. A cancellation request stops the walk at the next file boundary;
    ///    the report is marked cancelled
    /// 7. Unless a fatal classifier error aborted the walk, contexts receive
    ///    the finish notification and the progress value jumps to maximum
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Classifier`] when the classifier fails fatally.
    /// Contexts then never receive the finish notification and partial
    /// results must be treated as incomplete.
    pub fn scan_with_progress(&mut self, progress: &dyn Progress) -> Result<ScanReport, ScanError> {
        let mut report = ScanReport::default();

        if !self.config.root.is_dir() {
            warn!(root = %self.config.root, "scan root is not a readable directory, nothing to do");
            return Ok(report);
        }

        // Mirror cancellation requests into a flag the walk loops can poll
        // without going through the listener machinery.
        let stop = Arc::new(AtomicBool::new(progress.is_cancelled()));
        let mirror = Arc::clone(&stop);
        let listener_id = progress.subscribe(Arc::new(move |event: &ProgressEvent| {
            if event.field == ProgressField::Cancelled {
                mirror.store(event.new == ProgressValue::Flag(true), Ordering::Relaxed);
            }
        }));

        progress.set_indeterminate(true);
        progress.set_description("Building import list...");

        let index = DirectoryIndexer::new(self.config.recurse)
            .with_follow_links(self.config.follow_links)
            .build(&self.config.root, &stop);

        report.directories = index.directory_count();
        report.files = index.file_count();
        debug!(
            root = %self.config.root,
            directories = report.directories,
            files = report.files,
            "directory index built"
        );

        progress.set_indeterminate(false);
        progress.set_minimum(0);
        progress.set_maximum(report.files as u64);
        progress.set_value(0);
        progress.set_description(&format!("Scanning {} files...", report.files));

        for (_, context) in &self.contexts {
            context.lock().on_scan_start();
        }

        let mut visited: u64 = 0;
        let mut fatal: Option<ScanError> = None;
        index.walk(|_dir, file| {
            if stop.load(Ordering::Relaxed) {
                report.cancelled = true;
                return WalkFlow::Stop;
            }

            match self.classifier.classify(file) {
                Ok(Some(item)) => {
                    for (_, context) in &self.contexts {
                        context.lock().on_item_found(file, &item);
                    }
                    report.items += 1;
                }
                Ok(None) => report.skipped += 1,
                Err(err) if err.is_recoverable() => {
                    warn!(path = %file, error = %err, "skipping malformed file");
                    report.skipped += 1;
                    report.errors.push((file.to_owned(), err));
                }
                Err(err) => {
                    fatal = Some(ScanError::classifier(file, err));
                    return WalkFlow::Stop;
                }
            }

            visited += 1;
            progress.set_value(visited);
            WalkFlow::Continue
        });
        report.cancelled = report.cancelled || stop.load(Ordering::Relaxed);

        progress.unsubscribe(listener_id);

        if let Some(err) = fatal {
            warn!(path = %err.path(), "scan aborted by fatal classifier error");
            return Err(err);
        }

        for (_, context) in &self.contexts {
            context.lock().on_scan_finish();
        }

        // A finished scan reads as complete even when cut short.
        progress.set_value(progress.maximum());
        info!(
            root = %self.config.root,
            items = report.items,
            skipped = report.skipped,
            cancelled = report.cancelled,
            "scan finished"
        );

        Ok(report)
    }
}
