//! Conty Stories
//!
//! Extracts the linear "stories" of a pack from its branching, possibly
//! cyclic stage graph. Stories back the list and podcast views; they are
//! computed on demand and never touch the graph.
//!
//! # Algorithm
//!
//! - Depth-first walk over `next_from`, carrying the current path.
//! - At each step the candidates are narrowed by the transition's option
//!   index (see [`conty_core::graph::map_of_stages_for_option`]); whatever
//!   remains forks the walk.
//! - A candidate already on the path closes the branch (cycle).
//! - Once a story stage is reached the path only continues through an
//!   unbranched chain of further story stages.
//! - Paths without an audio-bearing story stage are dropped.
//!
//! Podcast mode skips the walk: every long stage is one episode.
//!
//! # Example
//!
//! ```rust
//! use conty_core::graph::{StageGraph, StageGraphQuery};
//! use conty_core::traits::NoDurationProbe;
//! use conty_stories::{extract_stories, ExtractOptions};
//!
//! let json = r#"{
//!     "stageNodes": [
//!         { "uuid": "cover", "squareOne": true,
//!           "okTransition": { "actionNode": "a1", "optionIndex": 0 } },
//!         { "uuid": "tale", "type": "story", "name": "The Owl",
//!           "audio": "tale.mp3", "duration": 60000 }
//!     ],
//!     "actionNodes": [ { "id": "a1", "options": ["tale"] } ]
//! }"#;
//! let (_, graph) = StageGraph::from_studio_json(json).unwrap();
//!
//! let stories = extract_stories(
//!     &graph,
//!     graph.start().unwrap(),
//!     &ExtractOptions::default(),
//!     &NoDurationProbe,
//! );
//! assert_eq!(stories.len(), 1);
//! assert_eq!(stories[0].name, "The Owl");
//! assert_eq!(stories[0].duration_ms, 60000);
//! ```

#![forbid(unsafe_code)]

mod materialize;
mod podcast;
mod traversal;

use conty_core::graph::{StageGraphQuery, StageId};
use conty_core::{DurationProbe, Story};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

pub use traversal::collect_paths;

/// Extraction settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Treat every long stage as an independent episode
    pub podcast: bool,

    /// Thumbnail used when a story has no single option image
    pub default_thumbnail: Option<String>,
}

impl ExtractOptions {
    /// Podcast-mode options
    pub fn podcast() -> Self {
        Self {
            podcast: true,
            ..Self::default()
        }
    }
}

/// Extract every story reachable from `start`
///
/// Never fails: dangling references only drop the branch they sit on.
pub fn extract_stories<G: StageGraphQuery + ?Sized>(
    graph: &G,
    start: StageId,
    options: &ExtractOptions,
    probe: &dyn DurationProbe,
) -> Vec<Story> {
    if options.podcast {
        return podcast::podcast_stories(graph, options, probe);
    }

    let paths = collect_paths(graph, start);
    let mut seen = HashSet::new();
    let mut stories = Vec::new();

    for path in paths {
        let key = materialize::story_key(graph, &path);
        if key.is_empty() {
            debug!(length = path.len(), "Dropping path without story audio");
            continue;
        }
        if !seen.insert(key) {
            continue;
        }
        if let Some(story) = materialize::materialize(graph, &path, stories.len(), options, probe)
        {
            stories.push(story);
        }
    }

    debug!(count = stories.len(), "Extracted stories");
    stories
}
