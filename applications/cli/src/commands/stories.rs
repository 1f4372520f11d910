use super::{format_duration, pack_id};
use crate::error::Result;
use conty_core::graph::StageGraphQuery;
use conty_core::{LoadedPack, Story};
use conty_metadata::LoftyDurationProbe;
use conty_stories::{extract_stories, ExtractOptions};
use conty_storage::load_pack_folder;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::info;

/// Stories extracted from one pack
#[derive(Debug, Clone, Serialize)]
pub struct StoriesReport {
    pub pack_id: String,
    pub title: String,
    pub podcast: bool,
    pub stories: Vec<Story>,
}

pub async fn stories(folder: &Path, options: &ExtractOptions) -> Result<StoriesReport> {
    let id = pack_id(folder)?;
    let LoadedPack { pack, graph } = load_pack_folder(&id, folder).await?;
    let start = graph.start()?;

    let probe = LoftyDurationProbe::for_pack(&pack);
    let stories = extract_stories(&graph, start, options, &probe);
    info!(pack = %id, count = stories.len(), podcast = options.podcast, "Extracted stories");

    Ok(StoriesReport {
        pack_id: id,
        title: pack.title().to_string(),
        podcast: options.podcast,
        stories,
    })
}

impl fmt::Display for StoriesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.podcast { "episodes" } else { "stories" };
        writeln!(f, "{}: {} {mode}", self.title, self.stories.len())?;
        for (i, story) in self.stories.iter().enumerate() {
            let label = match story.episode {
                Some(episode) => format!("#{episode}"),
                None => format!("{}.", i + 1),
            };
            writeln!(
                f,
                "  {label} {} [{}]",
                story.name,
                format_duration(story.duration_ms)
            )?;
            for file in &story.audio_files {
                writeln!(f, "       {file}")?;
            }
        }
        Ok(())
    }
}
