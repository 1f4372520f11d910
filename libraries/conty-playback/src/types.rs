//! Core types for navigation and playback

use crate::fade::FadeCurve;
use serde::{Deserialize, Serialize};

/// Player state as seen by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    /// No session, or nothing audible
    #[default]
    Stopped,

    /// Currently playing
    Playing,

    /// Paused mid-segment
    Paused,
}

/// Navigation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Length of the stop fade-out in milliseconds
    pub fade_out_ms: u64,

    /// Volume steps of the fade-out tween
    pub fade_steps: u32,

    /// Shape of the fade-out
    pub fade_curve: FadeCurve,

    /// Segments longer than this are described by their story name
    pub story_name_threshold_ms: u64,

    /// Maximum audio-less stages crossed in one entry, 0 = stage count
    pub max_pass_through: usize,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            fade_out_ms: 500,
            fade_steps: 25,
            fade_curve: FadeCurve::Linear,
            story_name_threshold_ms: 10_000,
            max_pass_through: 0,
        }
    }
}

/// What the host shows about the current segment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayingInfo {
    pub can_pause: bool,
    pub duration_ms: u64,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Image reference relative to the pack, `None` meaning the pack thumbnail
    pub image: Option<String>,
}

/// Snapshot of an active session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub pack_id: String,
    /// Uuids of the current candidate stages
    pub stages: Vec<String>,
    pub selected_index: usize,
    pub player_state: PlayerState,
}

impl NavigationState {
    /// Uuid of the selected stage
    pub fn current_stage(&self) -> Option<&str> {
        self.stages.get(self.selected_index).map(String::as_str)
    }
}
