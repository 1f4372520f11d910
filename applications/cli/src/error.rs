/// CLI error types
use conty_core::ContyError;
use conty_playback::PlaybackError;
use conty_storage::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid pack folder: {0}")]
    InvalidPack(String),

    #[error("Pack error: {0}")]
    Pack(#[from] ContyError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<StorageError> for CliError {
    fn from(err: StorageError) -> Self {
        // StorageError -> ContyError -> CliError
        CliError::Pack(err.into())
    }
}

impl From<conty_core::GraphIntegrityError> for CliError {
    fn from(err: conty_core::GraphIntegrityError) -> Self {
        CliError::Pack(err.into())
    }
}
