//! Directory-tree upload service implementation.
//!
//! [`UploadService`] copies every regular file under a local root to an
//! object store, mirroring the tree under a fixed key prefix. Directories are
//! never represented remotely; only file objects are created. Existing
//! objects at a key are overwritten, matching the behaviour of a plain
//! re-upload of the same dataset.

use crate::{StorageError, StorageResult};
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Outcome of one upload batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UploadReport {
    /// Files successfully stored remotely.
    pub uploaded: usize,
    /// Files that could not be read or stored; logged and skipped.
    pub failed: usize,
}

/// Service for uploading a local directory tree to an object store.
///
/// # Design
///
/// - Store-scoped: each instance is bound to one store and one key prefix
/// - Sequential: files are uploaded one at a time, in sorted path order
/// - Tolerant: per-file failures are logged, counted and skipped
#[derive(Debug)]
pub struct UploadService {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl UploadService {
    /// Creates a service over an already-constructed store.
    ///
    /// A trailing `/` on the prefix is trimmed so key joining stays uniform.
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into().trim_end_matches('/').to_string();
        Self { store, prefix }
    }

    /// Connects to a Google Cloud Storage bucket using ambient credentials
    /// (service-account environment variables, as resolved by the builder).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the client cannot be built or
    /// authenticated; the caller is expected to abort the upload job.
    pub fn connect_gcs(bucket: &str, prefix: &str) -> StorageResult<Self> {
        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(StorageError::Connection)?;

        Ok(Self::new(Arc::new(store), prefix))
    }

    /// Uploads every regular file under `local_root`, preserving each file's
    /// path relative to the root as its object key (under the prefix).
    ///
    /// Files are visited in sorted path order so progress logs are stable.
    /// A file that cannot be read or stored is logged and counted as failed;
    /// the remaining files continue to upload.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidRoot` if `local_root` does not exist or
    /// is not a directory, and `StorageError::Io` if enumerating the tree
    /// fails. Per-file upload failures never surface as errors.
    pub async fn upload_tree(&self, local_root: &Path) -> StorageResult<UploadReport> {
        if !local_root.exists() {
            return Err(StorageError::InvalidRoot(format!(
                "Directory does not exist: {}",
                local_root.display()
            )));
        }

        if !local_root.is_dir() {
            return Err(StorageError::InvalidRoot(format!(
                "Path is not a directory: {}",
                local_root.display()
            )));
        }

        let mut files = Vec::new();
        collect_files(local_root, &mut files)?;
        files.sort();

        tracing::info!("found {} files to upload", files.len());

        let mut report = UploadReport::default();
        for file in &files {
            let key = self.object_key(local_root, file);

            let bytes = match fs::read(file) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!("failed to read {}: {}", file.display(), e);
                    report.failed += 1;
                    continue;
                }
            };

            let location = ObjectPath::from(key.as_str());
            match self.store.put(&location, PutPayload::from(bytes)).await {
                Ok(_) => report.uploaded += 1,
                Err(e) => {
                    tracing::error!("failed to upload {}: {}", file.display(), e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    /// Builds the object key for `file`: the prefix followed by the path
    /// relative to `root`, joined with forward slashes on every platform.
    fn object_key(&self, root: &Path, file: &Path) -> String {
        let relative = file
            .strip_prefix(root)
            .expect("enumerated file is always under the root");

        let mut key = String::from(&self.prefix);
        for component in relative.components() {
            if !key.is_empty() {
                key.push('/');
            }
            key.push_str(&component.as_os_str().to_string_lossy());
        }
        key
    }
}

/// Recursively collects every regular file under `dir`.
///
/// Directories themselves are skipped; symlinks and other special entries are
/// not followed.
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            collect_files(&path, out)?;
        } else if file_type.is_file() {
            out.push(path);
        }
    }

    Ok(())
}
