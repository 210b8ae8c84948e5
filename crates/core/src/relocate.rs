//! Relocation of per-patient file pairs into split directories.
//!
//! Every patient owns an image (`<id>.png`) and a label file (`<id>.txt`) in
//! parallel source directories. After the partition is computed, each
//! patient's pair is moved into the matching subset directories. Moves are
//! per-file and independent: a missing or failing file is logged and skipped,
//! and the rest of the batch carries on.

use crate::constants::{IMAGE_EXTENSION, LABEL_EXTENSION};
use crate::{PrepError, PrepResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A pair of parallel directories, one for images and one for labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirPair {
    pub images: PathBuf,
    pub labels: PathBuf,
}

/// Outcome of one relocation batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    /// Files moved into the destination directories.
    pub moved: usize,
    /// Source files that did not exist and were skipped.
    pub missing: usize,
    /// Files whose move failed for any other reason.
    pub failed: usize,
}

/// Moves each patient's image and label file from `source` into `dest`.
///
/// Destination directories are created if absent. A missing source file is
/// logged as a warning and skipped; any other per-file error is logged and
/// does not abort the remaining batch. Partial success is expected and the
/// counts are returned in the [`MoveReport`].
///
/// # Errors
///
/// Returns `PrepError::DirCreation` only if a destination directory cannot be
/// created; per-file failures never surface as errors.
pub fn move_pairs(patient_ids: &[String], source: &DirPair, dest: &DirPair) -> PrepResult<MoveReport> {
    fs::create_dir_all(&dest.images).map_err(PrepError::DirCreation)?;
    fs::create_dir_all(&dest.labels).map_err(PrepError::DirCreation)?;

    let mut report = MoveReport::default();

    for patient_id in patient_ids {
        let image_name = format!("{patient_id}.{IMAGE_EXTENSION}");
        let label_name = format!("{patient_id}.{LABEL_EXTENSION}");

        move_one(
            &source.images.join(&image_name),
            &dest.images.join(&image_name),
            &mut report,
        );
        move_one(
            &source.labels.join(&label_name),
            &dest.labels.join(&label_name),
            &mut report,
        );
    }

    Ok(report)
}

/// Moves a single file, updating the report counters in place.
fn move_one(src: &Path, dst: &Path, report: &mut MoveReport) {
    if !src.exists() {
        tracing::warn!("source file not found, skipping: {}", src.display());
        report.missing += 1;
        return;
    }

    match move_file(src, dst) {
        Ok(()) => report.moved += 1,
        Err(e) => {
            tracing::error!("failed to move {} to {}: {}", src.display(), dst.display(), e);
            report.failed += 1;
        }
    }
}

/// Renames `src` to `dst`, falling back to copy-then-unlink when rename is
/// not possible (e.g. the destination lives on a different filesystem).
fn move_file(src: &Path, dst: &Path) -> io::Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(src, dst)?;
            fs::remove_file(src)
        }
    }
}
