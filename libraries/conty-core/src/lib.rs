//! Conty Core
//!
//! Platform-agnostic model of interactive audio-story packs.
//!
//! A pack is a directed graph of **stages** (image/audio nodes) linked by
//! **actions** (ordered branch points). This crate provides the building
//! blocks shared by the story extractor, the storage layer and the
//! navigation engine.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Stage`, `Action`, `Transition`, `Pack`, `Story`
//! - **Stage Graph**: one query surface (`StageGraphQuery`) over the two
//!   supported pack schemas (studio `story.json` and Telmi `nodes.json`)
//! - **Core Traits**: `PackRepository`, `DurationProbe`
//! - **Error Handling**: `GraphIntegrityError` plus the unified `ContyError`
//!
//! # Example
//!
//! ```rust
//! use conty_core::graph::{StageGraph, StageGraphQuery};
//!
//! let json = r#"{
//!     "title": "Demo",
//!     "stageNodes": [
//!         { "uuid": "cover", "type": "cover", "squareOne": true,
//!           "okTransition": { "actionNode": "a1", "optionIndex": 0 } },
//!         { "uuid": "tale", "type": "story", "audio": "tale.mp3" }
//!     ],
//!     "actionNodes": [ { "id": "a1", "options": ["tale"] } ]
//! }"#;
//!
//! let (_metadata, graph) = StageGraph::from_studio_json(json).unwrap();
//! let start = graph.start().unwrap();
//! let next = graph.next_from(start).unwrap();
//! assert_eq!(graph.stage(next[0]).uuid, "tale");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod graph;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{ContyError, GraphIntegrityError, Result};
pub use graph::{StageArena, StageGraph, StageGraphQuery, StageId};
pub use traits::{DurationProbe, PackRepository};
pub use types::{
    Action, ControlSettings, LoadedPack, Pack, PackKind, PackMetadata, Stage, StageType, Story,
    Transition,
};
