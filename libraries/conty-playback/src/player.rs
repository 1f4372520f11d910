//! Platform-agnostic audio player capability
//!
//! The engine never decodes audio itself. A host supplies a
//! [`PlayerFactory`] whose players report the end (or failure) of every
//! segment on a channel the engine drains on its own task.

use crate::error::Result;
use conty_core::Pack;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::mpsc;

/// Identifies one play request
///
/// Signals carrying a token other than the one of the live segment are
/// stale (late, duplicated, or from a segment that was replaced) and get
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentToken(u64);

impl SegmentToken {
    pub(crate) fn first() -> Self {
        Self(1)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Asynchronous report from a player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerSignal {
    /// Segment played to its natural end
    Completed(SegmentToken),

    /// Segment failed while playing
    Failed {
        token: SegmentToken,
        message: String,
    },
}

impl PlayerSignal {
    pub fn token(&self) -> SegmentToken {
        match self {
            PlayerSignal::Completed(token) | PlayerSignal::Failed { token, .. } => *token,
        }
    }
}

/// Sending half handed to players
pub type SignalSender = mpsc::UnboundedSender<PlayerSignal>;

/// Audio output for one session
///
/// Implementors own the decoder and output device. A looping segment never
/// completes.
pub trait AudioPlayer: Send {
    /// Start playing a file, replacing whatever was playing
    ///
    /// # Errors
    /// Returns an error if playback cannot start at all (missing file,
    /// unsupported format); failures after that are signalled
    fn play(&mut self, path: &Path, looping: bool, token: SegmentToken) -> Result<()>;

    /// Silence the current segment without reporting completion
    fn stop(&mut self);

    fn pause(&mut self);

    fn resume(&mut self);

    fn seek(&mut self, position_ms: u64);

    /// Output volume, 0.0 to 1.0
    fn set_volume(&mut self, volume: f32);

    /// Release the decoder and device; the player is not used afterwards
    fn dispose(&mut self);

    fn current_time_ms(&self) -> u64;

    /// Length of the current segment, 0 if unknown
    fn duration_ms(&self) -> u64;
}

/// Creates the player of a session
pub trait PlayerFactory: Send + Sync {
    fn create(&self, pack: &Pack, signals: SignalSender) -> Box<dyn AudioPlayer>;
}
