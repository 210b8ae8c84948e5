#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("labels table not found: {}", path.display())]
    LabelsNotFound { path: std::path::PathBuf },
    #[error("failed to read labels table: {0}")]
    LabelsRead(#[from] csv::Error),
    #[error("patient {patient_id} has invalid label value {value} (expected 0 or 1)")]
    InvalidLabel { patient_id: String, value: u8 },
    #[error("class {label} has only {count} members, too few to stratify across the requested splits")]
    ClassTooSmall { label: u8, count: usize },
    #[error("failed to create destination directory: {0}")]
    DirCreation(std::io::Error),
}

pub type PrepResult<T> = std::result::Result<T, PrepError>;
