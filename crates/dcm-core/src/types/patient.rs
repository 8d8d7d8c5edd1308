//! Patient identity keys, patient records, and the hierarchy root.

use std::fmt;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::hash::{FxHashMap, fx_hash_map};

use super::instance::InstanceRecord;
use super::item::DicomItem;
use super::study::StudyRecord;

/// Default birth date substituted when the source record left it blank.
const DEFAULT_BIRTH_DATE: &str = "00000000";

/// The composite identity key of a patient.
///
/// Two records belong to the same patient exactly when their name, birth
/// date, and patient ID all match. The key is the three parts joined with
/// `_`, with a blank birth date replaced by `00000000` and a missing ID
/// contributing an empty segment.
///
/// # Examples
///
/// ```
/// use dcm_core::PatientKey;
///
/// let key = PatientKey::derive("DOE^JANE", "19700101", "P-001");
/// assert_eq!(key.as_str(), "DOE^JANE_19700101_P-001");
///
/// let sparse = PatientKey::derive("DOE^JANE", "", "");
/// assert_eq!(sparse.as_str(), "DOE^JANE_00000000_");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatientKey(String);

impl PatientKey {
    /// Derives the key from patient demographics, applying defaults for
    /// blank fields.
    #[must_use]
    pub fn derive(name: &str, birth_date: &str, id: &str) -> Self {
        let birth_date = if birth_date.is_empty() {
            DEFAULT_BIRTH_DATE
        } else {
            birth_date
        };
        Self(format!("{name}_{birth_date}_{id}"))
    }

    /// Derives the key for a classified item.
    #[must_use]
    pub fn for_item(item: &DicomItem) -> Self {
        Self::derive(&item.patient_name, &item.patient_birth_date, &item.patient_id)
    }

    /// Returns the key as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One patient, owning their studies keyed by study UID.
///
/// # Examples
///
/// ```
/// use dcm_core::{DicomItem, PatientKey, PatientRecord};
///
/// let item = DicomItem {
///     patient_name: "DOE^JANE".to_owned(),
///     ..DicomItem::with_uids("1.2", "1.2.1", "1.2.1.1")
/// };
/// let mut patient = PatientRecord::for_item(&item);
///
/// patient.study_or_insert("1.2");
/// assert_eq!(patient.study_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Composite identity key of this patient.
    pub key: PatientKey,

    /// Patient name as recorded in the source data.
    pub name: String,

    /// Patient birth date as recorded in the source data (may be empty).
    pub birth_date: String,

    /// Patient ID as recorded in the source data (may be empty).
    pub id: String,

    /// Owned studies keyed by study UID.
    studies: FxHashMap<String, StudyRecord>,
}

impl PatientRecord {
    /// Creates an empty patient record carrying the demographics of `item`.
    #[must_use]
    pub fn for_item(item: &DicomItem) -> Self {
        Self {
            key: PatientKey::for_item(item),
            name: item.patient_name.clone(),
            birth_date: item.patient_birth_date.clone(),
            id: item.patient_id.clone(),
            studies: fx_hash_map(),
        }
    }

    /// Finds the study with the given UID, creating it on first reference.
    pub fn study_or_insert(&mut self, study_uid: &str) -> &mut StudyRecord {
        self.studies
            .entry(study_uid.to_owned())
            .or_insert_with(|| StudyRecord::new(study_uid, self.key.clone()))
    }

    /// Looks up a study by UID.
    #[must_use]
    pub fn study(&self, study_uid: &str) -> Option<&StudyRecord> {
        self.studies.get(study_uid)
    }

    /// Returns the number of studies owned by this patient.
    #[inline]
    #[must_use]
    pub fn study_count(&self) -> usize {
        self.studies.len()
    }

    /// Iterates over the studies in unspecified order.
    pub fn studies(&self) -> impl Iterator<Item = &StudyRecord> {
        self.studies.values()
    }

    /// Returns the studies sorted by UID for deterministic output.
    #[must_use]
    pub fn studies_sorted(&self) -> Vec<&StudyRecord> {
        let mut studies: Vec<&StudyRecord> = self.studies.values().collect();
        studies.sort_by(|a, b| a.uid.cmp(&b.uid));
        studies
    }

    /// Returns the total number of instances across all studies.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.studies.values().map(StudyRecord::instance_count).sum()
    }
}

/// The top-level container of a completed hierarchy.
///
/// Owns every [`PatientRecord`]; both the primary result of an aggregation
/// and each duplicate bucket are a `PatientRoot` of their own.
///
/// # Examples
///
/// ```
/// use dcm_core::{DicomItem, PatientRoot};
/// use camino::Utf8Path;
///
/// let mut root = PatientRoot::new();
/// let item = DicomItem {
///     patient_name: "DOE^JANE".to_owned(),
///     ..DicomItem::with_uids("1.2", "1.2.1", "1.2.1.1")
/// };
///
/// root.insert_item(Utf8Path::new("/data/a.dcm"), &item);
/// assert_eq!(root.patient_count(), 1);
/// assert_eq!(root.instance_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRoot {
    /// Owned patients keyed by the string form of their identity key.
    patients: FxHashMap<String, PatientRecord>,
}

impl PatientRoot {
    /// Creates an empty root.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a classified item, creating any missing ancestor record on
    /// first reference.
    ///
    /// The patient is found or created by identity key, the study by study
    /// UID within that patient, the series by series UID within that study,
    /// and the instance is placed under its SOP instance UID. Returns the
    /// instance previously stored under that UID in the same series, if any
    /// (callers that partition duplicates never trigger a replacement).
    pub fn insert_item(&mut self, file: &Utf8Path, item: &DicomItem) -> Option<InstanceRecord> {
        let key = PatientKey::for_item(item);
        let patient = self
            .patients
            .entry(key.as_str().to_owned())
            .or_insert_with(|| PatientRecord::for_item(item));

        patient
            .study_or_insert(&item.study_uid)
            .series_or_insert(&item.series_uid)
            .insert(InstanceRecord::from_item(file, item))
    }

    /// Looks up a patient by identity key.
    #[must_use]
    pub fn patient(&self, key: &PatientKey) -> Option<&PatientRecord> {
        self.patients.get(key.as_str())
    }

    /// Returns the number of patients in this hierarchy.
    #[inline]
    #[must_use]
    pub fn patient_count(&self) -> usize {
        self.patients.len()
    }

    /// Returns `true` if the hierarchy holds no patients.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Iterates over the patients in unspecified order.
    pub fn patients(&self) -> impl Iterator<Item = &PatientRecord> {
        self.patients.values()
    }

    /// Returns the patients sorted by identity key for deterministic output.
    #[must_use]
    pub fn patients_sorted(&self) -> Vec<&PatientRecord> {
        let mut patients: Vec<&PatientRecord> = self.patients.values().collect();
        patients.sort_by(|a, b| a.key.cmp(&b.key));
        patients
    }

    /// Returns the total number of instances across the whole hierarchy.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.patients.values().map(PatientRecord::instance_count).sum()
    }
}
