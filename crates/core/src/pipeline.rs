//! The end-to-end split job.
//!
//! Reads the labels table, computes the stratified three-way partition and
//! relocates every patient's file pair into its subset directory. The job is
//! fully sequential; the only tolerated failures are per-file relocation
//! problems, which are logged and counted rather than aborting the batch.

use crate::config::{SplitConfig, Subset};
use crate::labels::{self, PatientRecord};
use crate::relocate::{self, MoveReport};
use crate::split;
use crate::PrepResult;

/// Summary of a completed split job.
#[derive(Debug, Clone, Copy)]
pub struct SplitSummary {
    pub total_patients: usize,
    pub positive_patients: usize,
    pub train_patients: usize,
    pub val_patients: usize,
    pub test_patients: usize,
    pub moves: MoveReport,
}

/// Runs the full split job described by `config`.
///
/// # Errors
///
/// Fails if the labels table is missing or unreadable, if the configuration
/// fractions cannot stratify some class, or if a destination directory cannot
/// be created. Per-file relocation failures are reflected in the summary's
/// [`MoveReport`] instead.
pub fn run_split(config: &SplitConfig) -> PrepResult<SplitSummary> {
    let records = labels::read_labels(config.labels_csv())?;
    let positive = records.iter().filter(|r| r.is_positive()).count();

    tracing::info!("found {} patients in labels table", records.len());
    tracing::info!(
        "positive cases: {}, negative cases: {}",
        positive,
        records.len() - positive
    );

    let assignment = split::three_way_split(
        &records,
        config.val_fraction(),
        config.test_fraction(),
        config.seed(),
    )?;

    let total = records.len();
    for (subset, members) in [
        (Subset::Train, &assignment.train),
        (Subset::Val, &assignment.val),
        (Subset::Test, &assignment.test),
    ] {
        tracing::info!(
            "{} subset: {} patients ({:.1}%)",
            subset,
            members.len(),
            100.0 * members.len() as f64 / total as f64
        );
    }

    let source = config.source_dirs();
    let mut moves = MoveReport::default();
    for (subset, members) in [
        (Subset::Train, &assignment.train),
        (Subset::Val, &assignment.val),
        (Subset::Test, &assignment.test),
    ] {
        let ids: Vec<String> = members.iter().map(|r| r.patient_id.clone()).collect();
        let report = relocate::move_pairs(&ids, &source, &config.subset_dirs(subset))?;
        tracing::info!(
            "moved {} {} files ({} missing, {} failed)",
            report.moved,
            subset,
            report.missing,
            report.failed
        );
        moves.moved += report.moved;
        moves.missing += report.missing;
        moves.failed += report.failed;
    }

    Ok(SplitSummary {
        total_patients: total,
        positive_patients: positive,
        train_patients: assignment.train.len(),
        val_patients: assignment.val.len(),
        test_patients: assignment.test.len(),
        moves,
    })
}

/// Convenience used by tests and callers that already hold records in memory.
pub fn class_balance(records: &[PatientRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().filter(|r| r.is_positive()).count() as f64 / records.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Builds a full on-disk fixture: labels CSV plus one image and one label
    /// file per patient.
    fn build_fixture(root: &Path, total: usize, positives: usize) -> SplitConfig {
        let images = root.join("processed/images");
        let labels_dir = root.join("processed/labels");
        fs::create_dir_all(&images).unwrap();
        fs::create_dir_all(&labels_dir).unwrap();

        let mut csv = String::from("patientId,Target\n");
        for i in 0..total {
            let id = format!("patient-{i:04}");
            let target = u8::from(i < positives);
            csv.push_str(&format!("{id},{target}\n"));
            fs::write(images.join(format!("{id}.png")), b"img").unwrap();
            fs::write(labels_dir.join(format!("{id}.txt")), b"lbl").unwrap();
        }
        let labels_csv = root.join("labels.csv");
        fs::write(&labels_csv, csv).unwrap();

        SplitConfig::new(
            labels_csv,
            images,
            labels_dir,
            root.join("processed"),
            0.15,
            0.15,
            42,
        )
        .unwrap()
    }

    #[test]
    fn test_run_split_end_to_end() {
        let temp = TempDir::new().unwrap();
        let config = build_fixture(temp.path(), 100, 20);

        let summary = run_split(&config).unwrap();

        assert_eq!(summary.total_patients, 100);
        assert_eq!(summary.positive_patients, 20);
        assert_eq!(summary.train_patients, 70);
        assert_eq!(summary.val_patients, 15);
        assert_eq!(summary.test_patients, 15);
        // Two files per patient, all present in the fixture.
        assert_eq!(summary.moves.moved, 200);
        assert_eq!(summary.moves.missing, 0);
        assert_eq!(summary.moves.failed, 0);

        // Source directories are drained.
        let leftover = fs::read_dir(temp.path().join("processed/images"))
            .unwrap()
            .count();
        assert_eq!(leftover, 0);

        // Every destination directory received files.
        for subset in ["train", "val", "test"] {
            let images = temp.path().join(format!("processed/{subset}/images"));
            assert!(fs::read_dir(images).unwrap().count() > 0);
        }
    }

    #[test]
    fn test_run_split_missing_labels_moves_nothing() {
        let temp = TempDir::new().unwrap();
        let config = build_fixture(temp.path(), 50, 10);
        fs::remove_file(config.labels_csv()).unwrap();

        let result = run_split(&config);

        assert!(matches!(result, Err(crate::PrepError::LabelsNotFound { .. })));
        // No partition happened, so sources are untouched.
        let untouched = fs::read_dir(temp.path().join("processed/images"))
            .unwrap()
            .count();
        assert_eq!(untouched, 50);
        assert!(!temp.path().join("processed/train").exists());
    }

    #[test]
    fn test_run_split_tolerates_missing_pairs() {
        let temp = TempDir::new().unwrap();
        let config = build_fixture(temp.path(), 100, 20);
        // Drop one image before the run; the job should still finish.
        fs::remove_file(temp.path().join("processed/images/patient-0000.png")).unwrap();

        let summary = run_split(&config).unwrap();

        assert_eq!(summary.moves.moved, 199);
        assert_eq!(summary.moves.missing, 1);
    }

    #[test]
    fn test_class_balance() {
        let temp = TempDir::new().unwrap();
        let config = build_fixture(temp.path(), 10, 3);
        let records = crate::labels::read_labels(config.labels_csv()).unwrap();

        assert!((class_balance(&records) - 0.3).abs() < f64::EPSILON);
        assert_eq!(class_balance(&[]), 0.0);
    }
}
