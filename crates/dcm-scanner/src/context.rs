//! The two seams a scan is parameterized over.
//!
//! [`ItemClassifier`] decides, per file, whether the file is an item of
//! interest and produces the typed item when it is. [`ScanContext`] consumes
//! the scan lifecycle: a start notification, one call per classified item,
//! and a finish notification. The scanner owns neither policy; both are
//! supplied by the caller.

use std::sync::Arc;

use camino::Utf8Path;
use parking_lot::Mutex;

use crate::error::ClassifyError;

/// Per-file classification policy.
///
/// A classifier inspects one file at a time and reports one of three
/// outcomes:
///
/// - `Ok(Some(item))`: the file is an item of interest
/// - `Ok(None)`: the file is not of interest (counted, never an error)
/// - `Err(e)`: decoding failed; [`ClassifyError::Malformed`] lets the scan
///   continue, [`ClassifyError::Fatal`] aborts it
///
/// Classifiers must be cheap to call in a tight loop; any expensive
/// per-file work (header decode, hashing) is the dominant cost of a scan.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use dcm_scanner::{ClassifyError, ItemClassifier};
///
/// /// Classifies by file extension alone.
/// struct ExtensionClassifier;
///
/// impl ItemClassifier for ExtensionClassifier {
///     type Item = String;
///
///     fn classify(&self, path: &Utf8Path) -> Result<Option<String>, ClassifyError> {
///         Ok((path.extension() == Some("dcm")).then(|| path.to_string()))
///     }
/// }
///
/// let classifier = ExtensionClassifier;
/// assert!(classifier.classify(Utf8Path::new("a.dcm")).unwrap().is_some());
/// assert!(classifier.classify(Utf8Path::new("a.txt")).unwrap().is_none());
/// ```
pub trait ItemClassifier {
    /// The typed item produced for files of interest.
    type Item;

    /// Classifies a single file.
    fn classify(&self, path: &Utf8Path) -> Result<Option<Self::Item>, ClassifyError>;
}

/// A consumer of the scan lifecycle.
///
/// For every scan, each registered context receives exactly one
/// [`on_scan_start`](Self::on_scan_start), zero or more
/// [`on_item_found`](Self::on_item_found) calls, and - unless the scan
/// aborts fatally - exactly one [`on_scan_finish`](Self::on_scan_finish).
/// A cancelled scan still finishes; partial results are valid for the
/// files already visited.
///
/// Notifications are synchronous and arrive in context registration order,
/// so a slow context delays the scan.
pub trait ScanContext<T>: Send {
    /// Called once before any item is dispatched. Reset accumulated state here.
    fn on_scan_start(&mut self);

    /// Called once per classified item, with the file it came from.
    fn on_item_found(&mut self, file: &Utf8Path, item: &T);

    /// Called once after the walk completes or is cancelled.
    ///
    /// Never called when the scan aborts on a fatal classifier error.
    fn on_scan_finish(&mut self);
}

/// A context handle shared between the scanner and the caller.
///
/// The scanner locks it per notification; the caller keeps a clone to read
/// accumulated results after the scan returns.
pub type SharedContext<T> = Arc<Mutex<dyn ScanContext<T>>>;

/// Wraps a context for registration.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use dcm_scanner::{ScanContext, shared_context};
///
/// #[derive(Default)]
/// struct Counter(usize);
///
/// impl ScanContext<String> for Counter {
///     fn on_scan_start(&mut self) { self.0 = 0; }
///     fn on_item_found(&mut self, _file: &Utf8Path, _item: &String) { self.0 += 1; }
///     fn on_scan_finish(&mut self) {}
/// }
///
/// let counter = shared_context(Counter::default());
/// assert_eq!(counter.lock().0, 0);
/// ```
pub fn shared_context<T, C>(context: C) -> Arc<Mutex<C>>
where
    C: ScanContext<T>,
{
    Arc::new(Mutex::new(context))
}

/// Handle identifying one registered context, for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(pub(crate) u64);
