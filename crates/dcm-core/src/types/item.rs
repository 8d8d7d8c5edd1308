//! The classified-item record produced by an external decoder.
//!
//! Decoding DICOM binaries is not this workspace's job: a classifier (see
//! `dcm-scanner`) either hands back a [`DicomItem`] for a file or declines
//! it. This module only defines the record's shape.

use serde::{Deserialize, Serialize};

/// The structured record an external decoder extracts from one file.
///
/// Every field is permissive: identifiers and demographics may be empty
/// when the source file omitted them. Identity defaults (blank birth date,
/// missing patient ID) are applied by [`PatientKey::derive`], not here.
///
/// [`PatientKey::derive`]: crate::PatientKey::derive
///
/// # Examples
///
/// ```
/// use dcm_core::DicomItem;
///
/// let item = DicomItem {
///     patient_name: "DOE^JANE".to_owned(),
///     patient_birth_date: "19700101".to_owned(),
///     patient_id: "P-001".to_owned(),
///     study_uid: "1.2.3".to_owned(),
///     series_uid: "1.2.3.1".to_owned(),
///     sop_instance_uid: "1.2.3.1.1".to_owned(),
///     modality: "CT".to_owned(),
///     frame_count: 1,
/// };
/// assert_eq!(item.modality, "CT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicomItem {
    /// Patient name as recorded in the source file (may be empty).
    pub patient_name: String,

    /// Patient birth date in `YYYYMMDD` form (may be empty).
    pub patient_birth_date: String,

    /// Patient identifier assigned by the issuing institution (may be empty).
    pub patient_id: String,

    /// Study instance UID, unique within a patient.
    pub study_uid: String,

    /// Series instance UID, unique within a study.
    pub series_uid: String,

    /// SOP instance UID, expected globally unique within one scan.
    pub sop_instance_uid: String,

    /// Acquisition modality code (e.g. `CT`, `MR`).
    pub modality: String,

    /// Number of frames carried by this instance.
    pub frame_count: u32,
}

impl Default for DicomItem {
    fn default() -> Self {
        Self {
            patient_name: String::new(),
            patient_birth_date: String::new(),
            patient_id: String::new(),
            study_uid: String::new(),
            series_uid: String::new(),
            sop_instance_uid: String::new(),
            modality: String::new(),
            frame_count: 1,
        }
    }
}

impl DicomItem {
    /// Creates an item from its three-level UID path.
    ///
    /// Demographics and modality start empty; set them with struct update
    /// syntax when needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dcm_core::DicomItem;
    ///
    /// let item = DicomItem::with_uids("1.2.3", "1.2.3.1", "1.2.3.1.1");
    /// assert_eq!(item.sop_instance_uid, "1.2.3.1.1");
    /// assert_eq!(item.frame_count, 1);
    /// ```
    #[must_use]
    pub fn with_uids(
        study_uid: impl Into<String>,
        series_uid: impl Into<String>,
        sop_instance_uid: impl Into<String>,
    ) -> Self {
        Self {
            study_uid: study_uid.into(),
            series_uid: series_uid.into(),
            sop_instance_uid: sop_instance_uid.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dicom_item_default() {
        let item = DicomItem::default();
        assert!(item.patient_name.is_empty());
        assert!(item.sop_instance_uid.is_empty());
        assert_eq!(item.frame_count, 1);
    }

    #[test]
    fn test_dicom_item_with_uids() {
        let item = DicomItem::with_uids("1.2", "1.2.1", "1.2.1.1");
        assert_eq!(item.study_uid, "1.2");
        assert_eq!(item.series_uid, "1.2.1");
        assert_eq!(item.sop_instance_uid, "1.2.1.1");
        assert!(item.modality.is_empty());
    }

    #[test]
    fn test_dicom_item_serialization() {
        let item = DicomItem {
            patient_name: "DOE^JOHN".to_owned(),
            modality: "MR".to_owned(),
            frame_count: 24,
            ..DicomItem::with_uids("1.2", "1.2.1", "1.2.1.1")
        };

        let json = serde_json::to_string(&item).unwrap();
        let parsed: DicomItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, parsed);
    }
}
