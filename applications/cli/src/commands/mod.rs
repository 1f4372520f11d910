//! Subcommand implementations
//!
//! Each command returns a report; `main` decides how to print it.

mod inspect;
mod list;
mod stories;
mod walk;

pub use inspect::{inspect, HomeRepair, InspectReport};
pub use list::list;
pub use stories::{stories, StoriesReport};
pub use walk::{walk, PlayedStage, WalkReport};

use crate::error::{CliError, Result};
use std::path::Path;

/// Pack id of a pack folder: its last path component
fn pack_id(folder: &Path) -> Result<String> {
    folder
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| CliError::InvalidPack(folder.display().to_string()))
}

/// `m:ss` rendering of a length in milliseconds
pub fn format_duration(duration_ms: u64) -> String {
    let seconds = duration_ms / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
