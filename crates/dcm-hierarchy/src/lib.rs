//! Patient/study/series/instance aggregation over scanned DICOM items.
//!
//! This crate supplies the [`HierarchyAggregator`], a
//! [`ScanContext`](dcm_scanner::ScanContext) that consumes the
//! [`DicomItem`](dcm_core::DicomItem)s a scan classifies and arranges them
//! into the four-level patient hierarchy from `dcm-core`. Repeated SOP
//! instance UIDs are diverted into [`DuplicateBucket`]s rather than
//! overwriting what is already placed, so every occurrence on disk remains
//! addressable after the scan.
//!
//! Register a shared aggregator with a
//! [`PathScanner`](dcm_scanner::PathScanner) and keep a handle to read the
//! results once the scan returns:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use camino::Utf8Path;
//! use dcm_hierarchy::HierarchyAggregator;
//! use dcm_scanner::{
//!     ClassifyError, ItemClassifier, PathScanner, ScanConfig, shared_context,
//! };
//!
//! # struct HeaderClassifier;
//! # impl ItemClassifier for HeaderClassifier {
//! #     type Item = dcm_core::DicomItem;
//! #     fn classify(&self, _: &Utf8Path) -> Result<Option<dcm_core::DicomItem>, ClassifyError> {
//! #         Ok(None)
//! #     }
//! # }
//! # fn main() -> Result<(), dcm_scanner::ScanError> {
//! let aggregator = shared_context(HierarchyAggregator::new());
//! let mut scanner = PathScanner::new(ScanConfig::new("/data/incoming"), HeaderClassifier);
//! let handle = Arc::clone(&aggregator);
//! scanner.register_context(handle);
//!
//! scanner.scan()?;
//! println!("{} patients", aggregator.lock().primary().patient_count());
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod aggregator;

pub use aggregator::{DuplicateBucket, HierarchyAggregator};
