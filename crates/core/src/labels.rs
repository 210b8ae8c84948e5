//! Labels table parsing.
//!
//! The labels table is a CSV with at least `patientId` and `Target` columns.
//! The upstream table carries one row per bounding box, so a patient with
//! several findings appears several times; only the first row per patient is
//! kept, since the `Target` value is constant within a patient.

use crate::{PrepError, PrepResult};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// One patient with its binary classification target.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PatientRecord {
    /// Unique identifier, also the stem of the patient's image and label files.
    #[serde(rename = "patientId")]
    pub patient_id: String,

    /// Binary class label: 1 for a positive (pneumonia) case, 0 otherwise.
    #[serde(rename = "Target")]
    pub target: u8,
}

impl PatientRecord {
    pub fn is_positive(&self) -> bool {
        self.target == 1
    }
}

/// Reads the labels table and collapses it to one record per patient.
///
/// Duplicate `patientId` rows are dropped, keeping the first occurrence so the
/// resulting order matches the file. Extra columns in the CSV are ignored.
///
/// # Errors
///
/// Returns `PrepError::LabelsNotFound` if the file does not exist,
/// `PrepError::LabelsRead` on CSV read or parse failure, and
/// `PrepError::InvalidLabel` if a `Target` value is neither 0 nor 1.
pub fn read_labels(path: &Path) -> PrepResult<Vec<PatientRecord>> {
    if !path.exists() {
        return Err(PrepError::LabelsNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;

    let mut records = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for row in reader.deserialize() {
        let record: PatientRecord = row?;

        if record.target > 1 {
            return Err(PrepError::InvalidLabel {
                patient_id: record.patient_id,
                value: record.target,
            });
        }

        if seen.insert(record.patient_id.clone()) {
            records.push(record);
        }
    }

    Ok(records)
}
