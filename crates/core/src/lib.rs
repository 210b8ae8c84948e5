//! # cxr-core
//!
//! Core logic for the cxr-prep chest X-ray dataset preparation pipeline:
//! - Labels table parsing with per-patient deduplication
//! - Seeded, stratified train/val/test partitioning
//! - Relocation of per-patient image/label file pairs into split directories
//!
//! **No transport concerns**: object-store uploads live in `cxr-storage`,
//! command-line parsing in `cxr-cli`.

pub mod config;
pub mod constants;
pub mod labels;
pub mod pipeline;
pub mod relocate;
pub mod split;

mod error;

pub use config::{SplitConfig, Subset};
pub use error::{PrepError, PrepResult};
pub use labels::PatientRecord;
pub use pipeline::{run_split, SplitSummary};
pub use relocate::{DirPair, MoveReport};
pub use split::SplitAssignment;
