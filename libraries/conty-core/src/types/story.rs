/// Story artifact
use serde::{Deserialize, Serialize};

/// One complete linear playback path extracted from a stage graph
///
/// Derived and non-authoritative: computed on demand, never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Uuid of the last story stage on the path
    pub id: String,

    /// Display name
    pub name: String,

    /// Uuids of every stage on the path, start stage first
    pub stages: Vec<String>,

    /// Audio references of the story stages, in play order
    pub audio_files: Vec<String>,

    /// Images of the option stages met on the way
    pub images: Vec<String>,

    /// Cleaned names of the option stages met on the way
    pub names: Vec<String>,

    /// Length of each audio file in milliseconds
    pub durations: Vec<u64>,

    /// Total length in milliseconds
    pub duration_ms: u64,

    /// Image reference used as thumbnail, `None` meaning the pack thumbnail
    pub thumbnail: Option<String>,

    /// Podcast ordinal, set in podcast mode only
    pub episode: Option<u32>,
}
