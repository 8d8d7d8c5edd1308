//! Domain types for the dcm-import engine.
//!
//! # Module Organization
//!
//! - [`item`] - The classified record an external decoder produces per file
//! - [`patient`] - Patient identity keys, patient records, the hierarchy root
//! - [`study`] - Study records
//! - [`series`] - Series records
//! - [`instance`] - SOP instance records
//!
//! # Re-exports
//!
//! All public types are re-exported at this module level and at the crate
//! root:
//!
//! ```
//! use dcm_core::{DicomItem, PatientKey, PatientRoot};
//! ```

mod instance;
mod item;
mod patient;
mod series;
mod study;

// Re-export all public types
pub use instance::InstanceRecord;
pub use item::DicomItem;
pub use patient::{PatientKey, PatientRecord, PatientRoot};
pub use series::SeriesRecord;
pub use study::StudyRecord;
