//! Turning a stage path into a [`Story`]

use crate::ExtractOptions;
use conty_core::graph::{is_boilerplate_name, StageGraphQuery, StageId};
use conty_core::{DurationProbe, Stage, Story};
use tracing::warn;

/// Identity of the story a path plays: its audio-bearing story stages
///
/// Two paths reaching the same story stages through different menus are
/// the same story. Empty when the path plays nothing.
pub(crate) fn story_key<G: StageGraphQuery + ?Sized>(graph: &G, path: &[StageId]) -> Vec<StageId> {
    path.iter()
        .copied()
        .filter(|&id| graph.is_story(id) && graph.stage(id).audio.is_some())
        .collect()
}

/// Duration of a stage, probing the audio file if the pack omitted it
pub(crate) fn stage_duration(stage: &Stage, probe: &dyn DurationProbe) -> u64 {
    if let Some(duration) = stage.duration_ms {
        return duration;
    }
    let Some(audio) = stage.audio.as_deref() else {
        return 0;
    };
    probe.probe_duration(audio).unwrap_or_else(|err| {
        warn!(stage = %stage.uuid, audio, %err, "Could not probe audio duration");
        0
    })
}

pub(crate) fn materialize<G: StageGraphQuery + ?Sized>(
    graph: &G,
    path: &[StageId],
    index: usize,
    options: &ExtractOptions,
    probe: &dyn DurationProbe,
) -> Option<Story> {
    let story_stages = story_key(graph, path);
    let &last = story_stages.last()?;

    let mut audio_files = Vec::with_capacity(story_stages.len());
    let mut durations = Vec::with_capacity(story_stages.len());
    for &id in &story_stages {
        let stage = graph.stage(id);
        if let Some(audio) = &stage.audio {
            audio_files.push(audio.clone());
            durations.push(stage_duration(stage, probe));
        }
    }

    let mut images = Vec::new();
    let mut names = Vec::new();
    for &id in path {
        if graph.is_story(id) || !graph.is_option_stage(id) {
            continue;
        }
        if let Some(image) = &graph.stage(id).image {
            images.push(image.clone());
        }
        if let Some(name) = graph.clean_display_name(id) {
            names.push(name);
        }
    }

    let name = graph
        .clean_display_name(last)
        .filter(|name| !is_boilerplate_name(name))
        .or_else(|| match names.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        })
        .unwrap_or_else(|| format!("Story {}", index + 1));

    let thumbnail = match images.as_slice() {
        [only] => Some(only.clone()),
        _ => options.default_thumbnail.clone(),
    };

    Some(Story {
        id: graph.stage(last).uuid.clone(),
        name,
        stages: path.iter().map(|&id| graph.stage(id).uuid.clone()).collect(),
        duration_ms: durations.iter().sum(),
        audio_files,
        images,
        names,
        durations,
        thumbnail,
        episode: None,
    })
}
