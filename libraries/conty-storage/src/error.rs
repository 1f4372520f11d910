/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Folder holds neither a studio nor a Telmi pack
    #[error("Unknown pack format in {0}")]
    UnknownFormat(String),

    /// Pack id that would escape the library root
    #[error("Invalid pack id: {0}")]
    InvalidId(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Pack document parsed but its graph is unusable
    #[error(transparent)]
    Pack(#[from] conty_core::ContyError),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<StorageError> for conty_core::ContyError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => conty_core::ContyError::NotFound { entity, id },
            StorageError::Pack(inner) => inner,
            other => conty_core::ContyError::storage(other.to_string()),
        }
    }
}
