//! Error types for navigation and playback

use conty_core::{ContyError, GraphIntegrityError};
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The audio player rejected a request (decoder, missing file)
    #[error("Player error: {0}")]
    Player(String),

    /// Operation needs an open pack
    #[error("No active session")]
    NoActiveSession,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Chain of audio-less stages that never reaches playable content
    #[error("Pass-through loop at stage {0}")]
    PassThroughLoop(String),

    /// Dangling stage/action reference
    #[error(transparent)]
    Graph(#[from] GraphIntegrityError),

    /// Repository or core failure
    #[error(transparent)]
    Core(#[from] ContyError),
}

impl PlaybackError {
    /// Create a player error
    pub fn player(msg: impl Into<String>) -> Self {
        Self::Player(msg.into())
    }

    /// Whether the error ends the session (as opposed to one audio segment)
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Player(_) | Self::IndexOutOfBounds(_) | Self::NoActiveSession)
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
