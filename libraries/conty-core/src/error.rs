/// Core error types for Conty
use thiserror::Error;

/// Result type alias using `ContyError`
pub type Result<T> = std::result::Result<T, ContyError>;

/// A graph query hit a reference that does not resolve.
///
/// Fatal to a live navigation session, tolerated (branch dropped) during
/// story extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphIntegrityError {
    /// No stage carries this uuid
    #[error("Stage not found: {0}")]
    StageNotFound(String),

    /// No action carries this id
    #[error("Action not found: {0}")]
    ActionNotFound(String),

    /// A transition points at an action without options
    #[error("Action has no options: {0}")]
    EmptyAction(String),

    /// The pack declares no start stage
    #[error("Pack has no start stage")]
    MissingStartStage,
}

/// Core error type for Conty
#[derive(Error, Debug)]
pub enum ContyError {
    /// Dangling stage/action reference
    #[error(transparent)]
    Graph(#[from] GraphIntegrityError),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Audio playback errors
    #[error("Audio error: {0}")]
    Audio(String),

    /// Metadata probing errors
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Pack storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl ContyError {
    /// Create an audio error
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    /// Create a metadata error
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
