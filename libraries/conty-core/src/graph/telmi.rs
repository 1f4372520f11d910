//! Telmi pack schema (`nodes.json`)
//!
//! Stages and actions are maps; a stage's uuid is its map key. The entry
//! point is declared as a start transition rather than a flagged stage.

use super::{GraphResult, StageArena, StageGraphQuery, StageId};
use crate::types::{Action, ControlSettings, Stage, Transition};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TelmiDocument {
    start_action: RawTransition,
    #[serde(default)]
    stages: BTreeMap<String, RawStage>,
    #[serde(default)]
    actions: BTreeMap<String, Vec<RawOption>>,
}

#[derive(Debug, Deserialize)]
struct RawTransition {
    action: String,
    #[serde(default)]
    index: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawStage {
    name: Option<String>,
    audio: Option<String>,
    image: Option<String>,
    ok: Option<RawTransition>,
    home: Option<RawTransition>,
    control: Option<ControlSettings>,
}

#[derive(Debug, Deserialize)]
struct RawOption {
    stage: String,
}

impl RawTransition {
    /// A missing index and -1 (random pick on the device) both mean no
    /// preselection
    fn option_index(&self) -> Option<usize> {
        self.index.and_then(|index| usize::try_from(index).ok())
    }

    fn into_transition(self) -> Transition {
        let index = self.option_index();
        Transition::action(self.action, index)
    }
}

/// Stage graph of a Telmi pack
#[derive(Debug, Clone)]
pub struct TelmiGraph {
    arena: StageArena,
    start_action: Transition,
}

impl TelmiGraph {
    pub fn new(stages: Vec<Stage>, actions: Vec<Action>, start_action: Transition) -> Self {
        Self {
            arena: StageArena::new(stages, actions),
            start_action,
        }
    }

    /// Parse a `nodes.json` document
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let document: TelmiDocument = serde_json::from_str(json)?;

        let start_uuid = document
            .actions
            .get(&document.start_action.action)
            .and_then(|options| {
                let index = document.start_action.option_index().unwrap_or(0);
                options.get(index).or_else(|| options.first())
            })
            .map(|option| option.stage.clone());

        let stages = document
            .stages
            .into_iter()
            .map(|(key, raw)| {
                let mut stage = Stage::new(key);
                stage.is_start = start_uuid.as_deref() == Some(stage.uuid.as_str());
                stage.name = raw.name;
                stage.image = raw.image;
                stage.audio = raw.audio;
                stage.control_settings = raw.control.unwrap_or_default();
                stage.ok_transition = raw.ok.map(RawTransition::into_transition);
                stage.home_transition = raw.home.map(RawTransition::into_transition);
                stage
            })
            .collect();

        let actions = document
            .actions
            .into_iter()
            .map(|(key, options)| Action::new(key, options.into_iter().map(|o| o.stage)))
            .collect();

        Ok(Self::new(
            stages,
            actions,
            document.start_action.into_transition(),
        ))
    }

    pub(crate) fn arena_mut(&mut self) -> &mut StageArena {
        &mut self.arena
    }
}

impl StageGraphQuery for TelmiGraph {
    fn arena(&self) -> &StageArena {
        &self.arena
    }

    fn start(&self) -> GraphResult<StageId> {
        let candidates = self.arena.resolve(&self.start_action)?;
        let index = self
            .start_action
            .option_index()
            .filter(|&index| index < candidates.len())
            .unwrap_or(0);
        Ok(candidates[index])
    }

    /// Telmi packs carry no story marker, so story and podcast views are
    /// unavailable for them.
    fn is_story(&self, _id: StageId) -> bool {
        false
    }
}
