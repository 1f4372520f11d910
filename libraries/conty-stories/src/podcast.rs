//! Podcast mode: every long stage is an independent episode

use crate::materialize::stage_duration;
use crate::ExtractOptions;
use conty_core::graph::{StageGraphQuery, StageId, STORY_DURATION_THRESHOLD_MS};
use conty_core::{DurationProbe, Story};
use tracing::debug;

pub(crate) fn podcast_stories<G: StageGraphQuery + ?Sized>(
    graph: &G,
    options: &ExtractOptions,
    probe: &dyn DurationProbe,
) -> Vec<Story> {
    if !graph.supports_podcast() {
        debug!("Pack schema has no episode durations, podcast view is empty");
        return Vec::new();
    }

    let mut episodes: Vec<StageId> = graph
        .arena()
        .ids()
        .filter(|&id| {
            let stage = graph.stage(id);
            stage.audio.is_some()
                && stage
                    .duration_ms
                    .is_some_and(|duration| duration > STORY_DURATION_THRESHOLD_MS)
        })
        .collect();

    // stable: untagged episodes keep load order, after the tagged ones
    episodes.sort_by_key(|&id| {
        let episode = graph.stage(id).episode;
        (episode.is_none(), episode)
    });

    episodes
        .into_iter()
        .enumerate()
        .filter_map(|(index, id)| {
            let stage = graph.stage(id);
            let audio = stage.audio.clone()?;
            let duration = stage_duration(stage, probe);
            Some(Story {
                id: stage.uuid.clone(),
                name: graph
                    .story_name(id)
                    .unwrap_or_else(|| format!("Story {}", index + 1)),
                stages: vec![stage.uuid.clone()],
                audio_files: vec![audio],
                images: Vec::new(),
                names: Vec::new(),
                durations: vec![duration],
                duration_ms: duration,
                thumbnail: graph
                    .story_image(id)
                    .map(str::to_string)
                    .or_else(|| options.default_thumbnail.clone()),
                episode: stage.episode,
            })
        })
        .collect()
}
