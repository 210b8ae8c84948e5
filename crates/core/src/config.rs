//! Split job configuration.
//!
//! This module defines configuration that should be resolved once at process
//! startup and then passed into the split pipeline. The intent is to avoid
//! scattered path and ratio constants, which lead to inconsistent behaviour
//! between the pipeline and its tests.

use crate::constants::{
    IMAGES_DIR_NAME, LABELS_DIR_NAME, TEST_DIR_NAME, TRAIN_DIR_NAME, VAL_DIR_NAME,
};
use crate::relocate::DirPair;
use crate::{PrepError, PrepResult};
use std::path::{Path, PathBuf};

/// One of the three output subsets of a split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subset {
    Train,
    Val,
    Test,
}

impl Subset {
    /// Directory name for this subset under the output root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Subset::Train => TRAIN_DIR_NAME,
            Subset::Val => VAL_DIR_NAME,
            Subset::Test => TEST_DIR_NAME,
        }
    }
}

impl std::fmt::Display for Subset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Split configuration resolved at startup.
///
/// Fractions are expressed relative to the full dataset: with the defaults of
/// 0.15/0.15 the training subset receives the remaining 70%.
#[derive(Clone, Debug)]
pub struct SplitConfig {
    labels_csv: PathBuf,
    source_images_dir: PathBuf,
    source_labels_dir: PathBuf,
    output_root: PathBuf,
    val_fraction: f64,
    test_fraction: f64,
    seed: u64,
}

impl SplitConfig {
    /// Create a new `SplitConfig`.
    ///
    /// # Errors
    ///
    /// Returns `PrepError::InvalidConfig` if either fraction is outside
    /// `(0, 1)` or the two together leave nothing for the training subset.
    pub fn new(
        labels_csv: PathBuf,
        source_images_dir: PathBuf,
        source_labels_dir: PathBuf,
        output_root: PathBuf,
        val_fraction: f64,
        test_fraction: f64,
        seed: u64,
    ) -> PrepResult<Self> {
        for (name, value) in [("val_fraction", val_fraction), ("test_fraction", test_fraction)] {
            if !(value > 0.0 && value < 1.0) {
                return Err(PrepError::InvalidConfig(format!(
                    "{name} must be strictly between 0 and 1, got {value}"
                )));
            }
        }

        if val_fraction + test_fraction >= 1.0 {
            return Err(PrepError::InvalidConfig(format!(
                "val_fraction + test_fraction must leave room for training data, got {}",
                val_fraction + test_fraction
            )));
        }

        Ok(Self {
            labels_csv,
            source_images_dir,
            source_labels_dir,
            output_root,
            val_fraction,
            test_fraction,
            seed,
        })
    }

    pub fn labels_csv(&self) -> &Path {
        &self.labels_csv
    }

    /// Source directories the split moves files out of.
    pub fn source_dirs(&self) -> DirPair {
        DirPair {
            images: self.source_images_dir.clone(),
            labels: self.source_labels_dir.clone(),
        }
    }

    /// Destination directories for one subset, e.g. `<output_root>/train/images`.
    pub fn subset_dirs(&self, subset: Subset) -> DirPair {
        let base = self.output_root.join(subset.dir_name());
        DirPair {
            images: base.join(IMAGES_DIR_NAME),
            labels: base.join(LABELS_DIR_NAME),
        }
    }

    pub fn val_fraction(&self) -> f64 {
        self.val_fraction
    }

    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_fractions(val: f64, test: f64) -> PrepResult<SplitConfig> {
        SplitConfig::new(
            PathBuf::from("labels.csv"),
            PathBuf::from("images"),
            PathBuf::from("labels"),
            PathBuf::from("out"),
            val,
            test,
            42,
        )
    }

    #[test]
    fn test_valid_fractions_accepted() {
        assert!(config_with_fractions(0.15, 0.15).is_ok());
    }

    #[test]
    fn test_zero_fraction_rejected() {
        assert!(matches!(
            config_with_fractions(0.0, 0.15),
            Err(PrepError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_fraction_of_one_rejected() {
        assert!(matches!(
            config_with_fractions(0.15, 1.0),
            Err(PrepError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_fractions_consuming_everything_rejected() {
        assert!(matches!(
            config_with_fractions(0.5, 0.5),
            Err(PrepError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_subset_dirs_layout() {
        let config = config_with_fractions(0.15, 0.15).unwrap();
        let dirs = config.subset_dirs(Subset::Train);
        assert_eq!(dirs.images, PathBuf::from("out/train/images"));
        assert_eq!(dirs.labels, PathBuf::from("out/train/labels"));
    }
}
