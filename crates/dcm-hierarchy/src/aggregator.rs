//! The hierarchy-building scan context.
//!
//! [`HierarchyAggregator`] consumes classified items during a scan and
//! arranges them into the patient/study/series/instance hierarchy, keeping
//! SOP instance UIDs unique per result set. When the same UID arrives
//! again it is diverted into a [`DuplicateBucket`] instead of replacing the
//! copy already placed, so no occurrence of a UID is ever lost.

use camino::Utf8Path;
use tracing::{debug, info};

use dcm_core::hash::{FxHashSet, fx_hash_set};
use dcm_core::{DicomItem, PatientRoot};
use dcm_scanner::ScanContext;

/// One overflow hierarchy holding repeated SOP instance UIDs.
///
/// Buckets are created lazily, in order: the n-th bucket holds the
/// (n+1)-th occurrence of any UID. Each bucket is a complete
/// [`PatientRoot`] of its own, so downstream import logic can process it
/// exactly like a primary result.
#[derive(Debug, Clone, Default)]
pub struct DuplicateBucket {
    root: PatientRoot,
    /// UIDs already placed in this bucket.
    seen: FxHashSet<String>,
}

impl DuplicateBucket {
    /// Returns the hierarchy held by this bucket.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> &PatientRoot {
        &self.root
    }

    /// Returns `true` if this bucket already holds the given SOP instance UID.
    #[must_use]
    pub fn contains(&self, sop_uid: &str) -> bool {
        self.seen.contains(sop_uid)
    }

    /// Returns the number of instances in this bucket.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.root.instance_count()
    }

    fn insert(&mut self, file: &Utf8Path, item: &DicomItem) {
        self.root.insert_item(file, item);
        self.seen.insert(item.sop_instance_uid.clone());
    }
}

/// Builds patient hierarchies from scanned items, partitioning duplicate
/// SOP instance UIDs into overflow buckets.
///
/// # Placement policy
///
/// - The first occurrence of a UID goes into the primary hierarchy
/// - A repeated occurrence goes into the first bucket (in creation order)
///   that does not hold that UID yet; a new bucket is appended when every
///   existing one does
/// - Within the primary and within each bucket, UIDs are unique; across
///   all of them, every occurrence is retained
///
/// An empty SOP instance UID is an ordinary key: all items without a UID
/// share one slot per result set and overflow like any other duplicate.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use dcm_core::DicomItem;
/// use dcm_hierarchy::HierarchyAggregator;
/// use dcm_scanner::ScanContext;
///
/// let mut aggregator = HierarchyAggregator::new();
/// let item = DicomItem::with_uids("1.2", "1.2.1", "1.2.1.1");
///
/// aggregator.on_scan_start();
/// aggregator.on_item_found(Utf8Path::new("/a.dcm"), &item);
/// aggregator.on_item_found(Utf8Path::new("/copy/a.dcm"), &item);
/// aggregator.on_scan_finish();
///
/// assert_eq!(aggregator.primary().instance_count(), 1);
/// assert_eq!(aggregator.bucket_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HierarchyAggregator {
    primary: PatientRoot,
    /// UIDs already placed in the primary hierarchy.
    seen: FxHashSet<String>,
    buckets: Vec<DuplicateBucket>,
}

impl HierarchyAggregator {
    /// Creates an empty aggregator.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the primary hierarchy (first occurrence of every UID).
    #[inline]
    #[must_use]
    pub const fn primary(&self) -> &PatientRoot {
        &self.primary
    }

    /// Returns the overflow buckets in creation order.
    #[inline]
    #[must_use]
    pub fn duplicates(&self) -> &[DuplicateBucket] {
        &self.buckets
    }

    /// Returns the number of overflow buckets.
    #[inline]
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the total number of instances across the primary hierarchy
    /// and every bucket. Equals the number of items consumed.
    #[must_use]
    pub fn total_instance_count(&self) -> usize {
        self.primary.instance_count()
            + self
                .buckets
                .iter()
                .map(DuplicateBucket::instance_count)
                .sum::<usize>()
    }

    /// Consumes the aggregator, yielding the primary hierarchy and the
    /// overflow buckets.
    #[must_use]
    pub fn into_results(self) -> (PatientRoot, Vec<DuplicateBucket>) {
        (self.primary, self.buckets)
    }

    fn place(&mut self, file: &Utf8Path, item: &DicomItem) {
        let uid = item.sop_instance_uid.as_str();

        if self.seen.insert(uid.to_owned()) {
            self.primary.insert_item(file, item);
            return;
        }

        debug!(sop_uid = uid, path = %file, "duplicate SOP instance UID, diverting to bucket");
        if let Some(bucket) = self.buckets.iter_mut().find(|b| !b.contains(uid)) {
            bucket.insert(file, item);
        } else {
            let mut bucket = DuplicateBucket::default();
            bucket.insert(file, item);
            self.buckets.push(bucket);
        }
    }
}

impl ScanContext<DicomItem> for HierarchyAggregator {
    fn on_scan_start(&mut self) {
        // Each scan builds a fresh result set.
        self.primary = PatientRoot::new();
        self.seen = fx_hash_set();
        self.buckets = Vec::new();
    }

    fn on_item_found(&mut self, file: &Utf8Path, item: &DicomItem) {
        self.place(file, item);
    }

    fn on_scan_finish(&mut self) {
        info!(
            patients = self.primary.patient_count(),
            instances = self.primary.instance_count(),
            duplicate_buckets = self.buckets.len(),
            "hierarchy aggregation finished"
        );
    }
}
