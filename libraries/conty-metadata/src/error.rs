/// Metadata-specific errors
use thiserror::Error;

/// Result type alias using `MetadataError`
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Metadata error types
#[derive(Error, Debug)]
pub enum MetadataError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Lofty error
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),
}

impl From<MetadataError> for conty_core::ContyError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::FileNotFound(path) => conty_core::ContyError::not_found("audio", path),
            other => conty_core::ContyError::metadata(other.to_string()),
        }
    }
}
