//! End-to-end tests driving a real scan into the hierarchy aggregator.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use camino::Utf8Path;
use dcm_core::{DicomItem, PatientKey};
use dcm_hierarchy::HierarchyAggregator;
use dcm_scanner::{ClassifyError, ItemClassifier, PathScanner, ScanConfig, shared_context};

/// Decodes items from the file's own content: each test file holds
/// `name|study|series|sop` on one line. Non-`.dcm` files are skipped.
struct LineClassifier;

impl ItemClassifier for LineClassifier {
    type Item = DicomItem;

    fn classify(&self, path: &Utf8Path) -> Result<Option<DicomItem>, ClassifyError> {
        if path.extension() != Some("dcm") {
            return Ok(None);
        }
        let text = fs::read_to_string(path)
            .map_err(|e| ClassifyError::malformed(path, e.to_string()))?;
        let fields: Vec<&str> = text.trim().split('|').collect();
        let [name, study, series, sop] = fields.as_slice() else {
            return Err(ClassifyError::malformed(path, "wrong field count"));
        };
        Ok(Some(DicomItem {
            patient_name: (*name).to_owned(),
            ..DicomItem::with_uids(*study, *series, *sop)
        }))
    }
}

fn write_item(dir: &Path, file: &str, name: &str, study: &str, series: &str, sop: &str) {
    fs::write(dir.join(file), format!("{name}|{study}|{series}|{sop}")).unwrap();
}

#[test]
fn test_scan_builds_hierarchy_across_directories() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir(root.join("cd1")).unwrap();
    fs::create_dir(root.join("cd2")).unwrap();

    // One patient, two studies; the second study spans both directories.
    write_item(root, "cd1/a.dcm", "DOE^JANE", "1.2", "1.2.1", "1.2.1.1");
    write_item(root, "cd1/b.dcm", "DOE^JANE", "1.2", "1.2.1", "1.2.1.2");
    write_item(root, "cd1/c.dcm", "DOE^JANE", "1.3", "1.3.1", "1.3.1.1");
    write_item(root, "cd2/d.dcm", "DOE^JANE", "1.3", "1.3.2", "1.3.2.1");
    fs::write(root.join("cd2/readme.txt"), "not an item").unwrap();

    let aggregator = shared_context(HierarchyAggregator::new());
    let root = Utf8Path::from_path(root).unwrap();
    let mut scanner = PathScanner::new(ScanConfig::new(root), LineClassifier);
    let handle = Arc::clone(&aggregator);
    scanner.register_context(handle);

    let report = scanner.scan().unwrap();
    assert_eq!(report.items, 4);
    assert_eq!(report.skipped, 1);

    let aggregator = aggregator.lock();
    let primary = aggregator.primary();
    assert_eq!(primary.patient_count(), 1);
    assert_eq!(aggregator.bucket_count(), 0);

    let patient = primary
        .patient(&PatientKey::derive("DOE^JANE", "", ""))
        .unwrap();
    assert_eq!(patient.study_count(), 2);
    assert_eq!(patient.study("1.2").unwrap().series_count(), 1);
    assert_eq!(patient.study("1.3").unwrap().series_count(), 2);
    assert_eq!(primary.instance_count(), 4);
}

#[test]
fn test_duplicate_instances_across_directories_are_bucketed() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir(root.join("cd1")).unwrap();
    fs::create_dir(root.join("cd2")).unwrap();

    // The same SOP instance burned onto two discs.
    write_item(root, "cd1/a.dcm", "DOE^JANE", "1.2", "1.2.1", "1.2.1.1");
    write_item(root, "cd2/a.dcm", "DOE^JANE", "1.2", "1.2.1", "1.2.1.1");
    write_item(root, "cd2/b.dcm", "DOE^JANE", "1.2", "1.2.1", "1.2.1.2");

    let aggregator = shared_context(HierarchyAggregator::new());
    let root = Utf8Path::from_path(root).unwrap();
    let mut scanner = PathScanner::new(ScanConfig::new(root), LineClassifier);
    let handle = Arc::clone(&aggregator);
    scanner.register_context(handle);
    scanner.scan().unwrap();

    let aggregator = aggregator.lock();
    assert_eq!(aggregator.primary().instance_count(), 2);
    assert_eq!(aggregator.bucket_count(), 1);
    assert_eq!(aggregator.duplicates()[0].instance_count(), 1);
    assert_eq!(aggregator.total_instance_count(), 3);

    // Directories scan in lexicographic order, so the cd1 copy wins primary.
    let patient = aggregator
        .primary()
        .patient(&PatientKey::derive("DOE^JANE", "", ""))
        .unwrap();
    let instance = patient
        .study("1.2")
        .unwrap()
        .series("1.2.1")
        .unwrap()
        .instance("1.2.1.1")
        .unwrap();
    assert!(instance.source_file.as_str().contains("cd1"));
}

#[test]
fn test_malformed_files_do_not_reach_the_hierarchy() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write_item(root, "good.dcm", "DOE^JANE", "1.2", "1.2.1", "1.2.1.1");
    fs::write(root.join("torn.dcm"), "only|two").unwrap();

    let aggregator = shared_context(HierarchyAggregator::new());
    let root = Utf8Path::from_path(root).unwrap();
    let mut scanner = PathScanner::new(ScanConfig::new(root), LineClassifier);
    let handle = Arc::clone(&aggregator);
    scanner.register_context(handle);

    let report = scanner.scan().unwrap();
    assert_eq!(report.items, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(aggregator.lock().primary().instance_count(), 1);
}

#[test]
fn test_rescan_replaces_previous_results() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write_item(root, "a.dcm", "DOE^JANE", "1.2", "1.2.1", "1.2.1.1");
    write_item(root, "a_copy.dcm", "DOE^JANE", "1.2", "1.2.1", "1.2.1.1");

    let aggregator = shared_context(HierarchyAggregator::new());
    let root = Utf8Path::from_path(root).unwrap();
    let mut scanner = PathScanner::new(ScanConfig::new(root), LineClassifier);
    let handle = Arc::clone(&aggregator);
    scanner.register_context(handle);

    scanner.scan().unwrap();
    assert_eq!(aggregator.lock().bucket_count(), 1);

    fs::remove_file(root.join("a_copy.dcm")).unwrap();
    scanner.scan().unwrap();

    let aggregator = aggregator.lock();
    assert_eq!(aggregator.primary().instance_count(), 1);
    assert_eq!(aggregator.bucket_count(), 0);
}
