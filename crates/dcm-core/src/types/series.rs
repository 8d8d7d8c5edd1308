//! Series records: the third level of the hierarchy.

use serde::{Deserialize, Serialize};

use crate::hash::{FxHashMap, fx_hash_map};

use super::instance::InstanceRecord;

/// One imaging series, owning its instances keyed by SOP instance UID.
///
/// The modality is taken from the first instance inserted; in well-formed
/// data every instance of a series shares it.
///
/// # Examples
///
/// ```
/// use dcm_core::{DicomItem, InstanceRecord, SeriesRecord};
/// use camino::Utf8Path;
///
/// let mut series = SeriesRecord::new("1.2.1", "1.2");
/// let item = DicomItem::with_uids("1.2", "1.2.1", "1.2.1.1");
/// series.insert(InstanceRecord::from_item(Utf8Path::new("/a.dcm"), &item));
///
/// assert_eq!(series.instance_count(), 1);
/// assert!(series.instance("1.2.1.1").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRecord {
    /// Series instance UID.
    pub uid: String,

    /// Modality of the series (empty until the first instance arrives).
    pub modality: String,

    /// UID of the owning study (lookup key, not an owning reference).
    pub study_uid: String,

    /// Owned instances keyed by SOP instance UID.
    instances: FxHashMap<String, InstanceRecord>,
}

impl SeriesRecord {
    /// Creates an empty series with the given UID and owning-study key.
    #[must_use]
    pub fn new(uid: impl Into<String>, study_uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            modality: String::new(),
            study_uid: study_uid.into(),
            instances: fx_hash_map(),
        }
    }

    /// Inserts an instance, returning the previous record for that UID if
    /// one existed.
    ///
    /// The series modality is adopted from the first inserted instance.
    pub fn insert(&mut self, instance: InstanceRecord) -> Option<InstanceRecord> {
        if self.modality.is_empty() && !instance.modality.is_empty() {
            self.modality = instance.modality.clone();
        }
        self.instances.insert(instance.sop_uid.clone(), instance)
    }

    /// Looks up an instance by SOP instance UID.
    #[must_use]
    pub fn instance(&self, sop_uid: &str) -> Option<&InstanceRecord> {
        self.instances.get(sop_uid)
    }

    /// Returns the number of instances in this series.
    #[inline]
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Iterates over the instances in unspecified order.
    pub fn instances(&self) -> impl Iterator<Item = &InstanceRecord> {
        self.instances.values()
    }

    /// Returns the instances sorted by SOP instance UID.
    ///
    /// Use this wherever deterministic output matters (reports, tests).
    #[must_use]
    pub fn instances_sorted(&self) -> Vec<&InstanceRecord> {
        let mut instances: Vec<&InstanceRecord> = self.instances.values().collect();
        instances.sort_by(|a, b| a.sop_uid.cmp(&b.sop_uid));
        instances
    }
}
