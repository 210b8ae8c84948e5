//! # cxr-storage
//!
//! Upload of a prepared local dataset tree to a remote object store.
//!
//! ## Design
//!
//! - The service is bound to one store and one key prefix at construction
//! - Keys mirror local paths relative to the uploaded root, always using
//!   forward slashes regardless of host path conventions
//! - Uploads are sequential; a per-file failure is logged and the remaining
//!   files continue (partial success allowed)
//! - Connection or authentication failure to the store aborts the whole job
//!
//! ## Example Usage
//!
//! ```no_run
//! use cxr_storage::UploadService;
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), cxr_storage::StorageError> {
//! let service = UploadService::connect_gcs("my-bucket", "processed")?;
//! let report = service.upload_tree(Path::new("data/processed")).await?;
//! println!("uploaded {} files", report.uploaded);
//! # Ok(())
//! # }
//! ```

mod upload;

pub use upload::{UploadReport, UploadService};

/// Errors that can occur during upload operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Local root does not exist or is not a directory
    #[error("Invalid local root: {0}")]
    InvalidRoot(String),

    /// Could not construct or authenticate the object-store client
    #[error("Failed to connect to object store: {0}")]
    Connection(#[source] object_store::Error),

    /// I/O error while enumerating local files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
