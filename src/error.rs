use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File read error for {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl PipelineError {
    /// Storage failures mean the store itself is compromised; callers must
    /// abort the run instead of skipping to the next file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_are_fatal() {
        let err = PipelineError::Storage(sqlx::Error::PoolClosed);
        assert!(err.is_fatal());
    }

    #[test]
    fn test_file_errors_are_recoverable() {
        let err = PipelineError::FileRead {
            path: PathBuf::from("wx_data/S1.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("wx_data/S1.txt"));

        let err = PipelineError::InvalidFormat("no file name".to_string());
        assert!(!err.is_fatal());
    }
}
