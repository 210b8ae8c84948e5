//! Constants used throughout the cxr-core crate.
//!
//! This module contains all path, filename and split constants to ensure
//! consistency across the codebase and make maintenance easier.

/// Directory name for source and per-split image storage.
pub const IMAGES_DIR_NAME: &str = "images";

/// Directory name for source and per-split label storage.
pub const LABELS_DIR_NAME: &str = "labels";

/// Directory name for the training subset.
pub const TRAIN_DIR_NAME: &str = "train";

/// Directory name for the validation subset.
pub const VAL_DIR_NAME: &str = "val";

/// Directory name for the test subset.
pub const TEST_DIR_NAME: &str = "test";

/// File extension for patient images.
pub const IMAGE_EXTENSION: &str = "png";

/// File extension for patient label files.
pub const LABEL_EXTENSION: &str = "txt";

/// Default fraction of patients held out for the test subset.
pub const DEFAULT_TEST_FRACTION: f64 = 0.15;

/// Default fraction of patients held out for the validation subset,
/// expressed relative to the full dataset.
pub const DEFAULT_VAL_FRACTION: f64 = 0.15;

/// Default seed for the split shuffle, so repeated runs produce the
/// same partition.
pub const DEFAULT_SEED: u64 = 42;
