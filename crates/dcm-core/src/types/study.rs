//! Study records: the second level of the hierarchy.

use serde::{Deserialize, Serialize};

use crate::hash::{FxHashMap, fx_hash_map};

use super::patient::PatientKey;
use super::series::SeriesRecord;

/// One imaging study, owning its series keyed by series UID.
///
/// Carries a non-owning back-reference to the owning patient as a
/// [`PatientKey`], never a pointer.
///
/// # Examples
///
/// ```
/// use dcm_core::{PatientKey, StudyRecord};
///
/// let key = PatientKey::derive("DOE^JANE", "19700101", "P-001");
/// let mut study = StudyRecord::new("1.2", key);
///
/// let series = study.series_or_insert("1.2.1");
/// assert_eq!(series.uid, "1.2.1");
/// assert_eq!(study.series_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyRecord {
    /// Study instance UID.
    pub uid: String,

    /// Key of the owning patient (lookup key, not an owning reference).
    pub patient_key: PatientKey,

    /// Owned series keyed by series UID.
    series: FxHashMap<String, SeriesRecord>,
}

impl StudyRecord {
    /// Creates an empty study with the given UID and owning-patient key.
    #[must_use]
    pub fn new(uid: impl Into<String>, patient_key: PatientKey) -> Self {
        Self {
            uid: uid.into(),
            patient_key,
            series: fx_hash_map(),
        }
    }

    /// Finds the series with the given UID, creating it on first reference.
    pub fn series_or_insert(&mut self, series_uid: &str) -> &mut SeriesRecord {
        self.series
            .entry(series_uid.to_owned())
            .or_insert_with(|| SeriesRecord::new(series_uid, self.uid.clone()))
    }

    /// Looks up a series by UID.
    #[must_use]
    pub fn series(&self, series_uid: &str) -> Option<&SeriesRecord> {
        self.series.get(series_uid)
    }

    /// Returns the number of series in this study.
    #[inline]
    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Iterates over the series in unspecified order.
    pub fn all_series(&self) -> impl Iterator<Item = &SeriesRecord> {
        self.series.values()
    }

    /// Returns the series sorted by UID for deterministic output.
    #[must_use]
    pub fn series_sorted(&self) -> Vec<&SeriesRecord> {
        let mut series: Vec<&SeriesRecord> = self.series.values().collect();
        series.sort_by(|a, b| a.uid.cmp(&b.uid));
        series
    }

    /// Returns the total number of instances across all series.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.series.values().map(SeriesRecord::instance_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> PatientKey {
        PatientKey::derive("DOE^JANE", "19700101", "P-001")
    }

    #[test]
    fn test_study_series_or_insert_creates_once() {
        let mut study = StudyRecord::new("1.2", key());

        study.series_or_insert("1.2.1");
        study.series_or_insert("1.2.1");
        study.series_or_insert("1.2.2");

        assert_eq!(study.series_count(), 2);
        assert!(study.series("1.2.1").is_some());
        assert!(study.series("1.2.3").is_none());
    }

    #[test]
    fn test_study_back_reference_flows_down() {
        let mut study = StudyRecord::new("1.2", key());
        let series = study.series_or_insert("1.2.1");
        assert_eq!(series.study_uid, "1.2");
    }

    #[test]
    fn test_study_series_sorted() {
        let mut study = StudyRecord::new("1.2", key());
        study.series_or_insert("1.2.2");
        study.series_or_insert("1.2.1");

        let uids: Vec<&str> = study.series_sorted().iter().map(|s| s.uid.as_str()).collect();
        assert_eq!(uids, vec!["1.2.1", "1.2.2"]);
    }
}
