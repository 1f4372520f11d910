//! Studio pack schema (`story.json`)
//!
//! Flat arrays of stages and actions linked by uuid. The start stage carries
//! `squareOne: true`.

use super::{is_story_type, GraphResult, StageArena, StageGraphQuery, StageId};
use super::STORY_DURATION_THRESHOLD_MS;
use crate::error::GraphIntegrityError;
use crate::types::{Action, ControlSettings, PackMetadata, Stage, StageType, Transition};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudioDocument {
    #[serde(flatten)]
    metadata: PackMetadata,
    #[serde(default)]
    stage_nodes: Vec<RawStage>,
    #[serde(default)]
    action_nodes: Vec<RawAction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStage {
    uuid: String,
    #[serde(rename = "type")]
    stage_type: Option<String>,
    name: Option<String>,
    image: Option<String>,
    audio: Option<String>,
    ok_transition: Option<RawTransition>,
    home_transition: Option<RawTransition>,
    control_settings: Option<ControlSettings>,
    #[serde(default)]
    square_one: bool,
    duration: Option<f64>,
    episode: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransition {
    action_node: Option<String>,
    stage_node: Option<String>,
    option_index: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawAction {
    id: String,
    name: Option<String>,
    #[serde(default)]
    options: Vec<String>,
}

impl RawTransition {
    fn into_transition(self) -> Option<Transition> {
        if let Some(uuid) = self.stage_node {
            return Some(Transition::Stage { uuid });
        }
        // negative indexes mean "no preselection"
        let option_index = self
            .option_index
            .and_then(|index| usize::try_from(index).ok());
        self.action_node
            .map(|action_id| Transition::action(action_id, option_index))
    }
}

impl From<RawStage> for Stage {
    fn from(raw: RawStage) -> Self {
        Stage {
            uuid: raw.uuid,
            stage_type: raw
                .stage_type
                .as_deref()
                .map(StageType::from_tag)
                .unwrap_or_default(),
            name: raw.name,
            image: raw.image,
            audio: raw.audio,
            control_settings: raw.control_settings.unwrap_or_default(),
            ok_transition: raw.ok_transition.and_then(RawTransition::into_transition),
            home_transition: raw.home_transition.and_then(RawTransition::into_transition),
            is_start: raw.square_one,
            duration_ms: raw
                .duration
                .filter(|d| d.is_finite() && *d >= 0.0)
                .map(|d| d.round() as u64),
            episode: raw.episode,
        }
    }
}

/// Stage graph of a studio pack
#[derive(Debug, Clone)]
pub struct StudioGraph {
    arena: StageArena,
}

impl StudioGraph {
    pub fn new(stages: Vec<Stage>, actions: Vec<Action>) -> Self {
        Self {
            arena: StageArena::new(stages, actions),
        }
    }

    /// Parse a `story.json` document into pack metadata and a graph
    pub fn from_json(json: &str) -> crate::Result<(PackMetadata, Self)> {
        let document: StudioDocument = serde_json::from_str(json)?;
        let stages = document.stage_nodes.into_iter().map(Stage::from).collect();
        let actions = document
            .action_nodes
            .into_iter()
            .map(|raw| Action {
                id: raw.id,
                name: raw.name,
                options: raw.options,
            })
            .collect();
        Ok((document.metadata, Self::new(stages, actions)))
    }

    pub(crate) fn arena_mut(&mut self) -> &mut StageArena {
        &mut self.arena
    }
}

impl StageGraphQuery for StudioGraph {
    fn arena(&self) -> &StageArena {
        &self.arena
    }

    fn start(&self) -> GraphResult<StageId> {
        self.arena
            .ids()
            .find(|&id| self.arena.stage(id).is_start)
            .ok_or(GraphIntegrityError::MissingStartStage)
    }

    fn is_story(&self, id: StageId) -> bool {
        let stage = self.arena.stage(id);
        let controls = &stage.control_settings;
        is_story_type(stage)
            || stage
                .duration_ms
                .is_some_and(|duration| duration > STORY_DURATION_THRESHOLD_MS)
            || (stage.audio.is_some() && !controls.wheel && controls.pause)
    }

    fn supports_podcast(&self) -> bool {
        true
    }
}
