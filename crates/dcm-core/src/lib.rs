//! Core domain types for the dcm-import scanning engine.
//!
//! This crate provides the foundational types shared across the workspace:
//!
//! - The classified-item record ([`DicomItem`]) handed over by an external
//!   decoder
//! - The four-level clinical hierarchy ([`PatientRoot`] → [`PatientRecord`]
//!   → [`StudyRecord`] → [`SeriesRecord`] → [`InstanceRecord`])
//! - Patient identity keys ([`PatientKey`])
//! - Type aliases for `FxHashMap`/`FxHashSet` (faster than std for the UID
//!   string keys used everywhere)
//!
//! Ownership in the hierarchy flows strictly downward; child records refer
//! back to their container by lookup key only, so no reference cycles exist.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod hash;
pub mod types;

pub use hash::{FxBuildHasher, FxHashMap, FxHashSet, fx_hash_map, fx_hash_set};
pub use types::{DicomItem, InstanceRecord, PatientKey, PatientRecord, PatientRoot, SeriesRecord, StudyRecord};
