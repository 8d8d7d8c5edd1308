//! The leaf record of the hierarchy: one SOP instance.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use super::item::DicomItem;

/// One imaging instance (roughly: one image or structured record).
///
/// The smallest unit of the hierarchy. Keyed by SOP instance UID within its
/// owning series; carries a non-owning back-reference to that series as a
/// UID, never a pointer (ownership flows strictly downward).
///
/// # Examples
///
/// ```
/// use dcm_core::{DicomItem, InstanceRecord};
/// use camino::Utf8Path;
///
/// let item = DicomItem::with_uids("1.2", "1.2.1", "1.2.1.1");
/// let instance = InstanceRecord::from_item(Utf8Path::new("/data/a.dcm"), &item);
/// assert_eq!(instance.sop_uid, "1.2.1.1");
/// assert_eq!(instance.series_uid, "1.2.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// SOP instance UID identifying this instance.
    pub sop_uid: String,

    /// Acquisition modality code.
    pub modality: String,

    /// Number of frames carried by this instance.
    pub frame_count: u32,

    /// The file this instance was classified from.
    pub source_file: Utf8PathBuf,

    /// UID of the owning series (lookup key, not an owning reference).
    pub series_uid: String,
}

impl InstanceRecord {
    /// Derives an instance record from a classified item and its source file.
    #[must_use]
    pub fn from_item(file: &Utf8Path, item: &DicomItem) -> Self {
        Self {
            sop_uid: item.sop_instance_uid.clone(),
            modality: item.modality.clone(),
            frame_count: item.frame_count,
            source_file: file.to_owned(),
            series_uid: item.series_uid.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_from_item() {
        let item = DicomItem {
            modality: "CT".to_owned(),
            frame_count: 3,
            ..DicomItem::with_uids("1.2", "1.2.1", "1.2.1.9")
        };
        let instance = InstanceRecord::from_item(Utf8Path::new("/scans/x.dcm"), &item);

        assert_eq!(instance.sop_uid, "1.2.1.9");
        assert_eq!(instance.modality, "CT");
        assert_eq!(instance.frame_count, 3);
        assert_eq!(instance.source_file, Utf8Path::new("/scans/x.dcm"));
        assert_eq!(instance.series_uid, "1.2.1");
    }
}
