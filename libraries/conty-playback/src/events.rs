//! Navigation Events
//!
//! Event-based communication for UI synchronization. Events are queued by
//! the engine and drained by the host:
//! - Session start/stop
//! - Candidate stage set or selection changes
//! - Player state changes (play/pause/stop)
//! - Playback and session failures

use crate::types::{PlayerState, PlayingInfo};
use serde::{Deserialize, Serialize};

/// Events emitted by the navigation engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationEvent {
    /// Player state changed
    PlaybackChanged {
        /// The new player state
        state: PlayerState,
        /// Description of the segment, `None` once stopped
        playing_info: Option<PlayingInfo>,
    },

    /// A pack session started
    PackStarted {
        /// ID of the pack
        pack_id: String,
        /// Display title of the pack
        title: String,
    },

    /// The session was torn down
    PackStopped,

    /// Candidate stage set or selected index changed
    StagesChanged {
        /// Uuids of the candidate stages
        stages: Vec<String>,
        /// Index of the selected candidate
        selected_index: usize,
    },

    /// An audio segment failed; the session stays on the current stage
    PlaybackFailed {
        /// Error message
        message: String,
    },

    /// The session hit a fatal error and was torn down
    SessionFailed {
        /// Error message
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_variant_tag() {
        let event = NavigationEvent::StagesChanged {
            stages: vec!["a".to_string(), "b".to_string()],
            selected_index: 1,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("StagesChanged"));
        let back: NavigationEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
