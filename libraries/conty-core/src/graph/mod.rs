//! Stage graph
//!
//! Normalized, queryable representation of a pack's stages and actions.
//!
//! Both pack schemas are loaded into the same [`StageArena`]: stages live in
//! a `Vec` and are addressed by [`StageId`] (their index), actions are looked
//! up by id. Schema differences (start resolution, story classification)
//! live behind [`StageGraphQuery`], implemented by [`StudioGraph`],
//! [`TelmiGraph`] and the [`StageGraph`] enum that wraps them.

mod names;
mod repair;
mod studio;
mod telmi;

pub use names::{clean_display_name, is_boilerplate_name};
pub use repair::{find_missing_home, RepairOutcome};
pub use studio::StudioGraph;
pub use telmi::TelmiGraph;

use crate::error::GraphIntegrityError;
use crate::types::{Action, PackKind, PackMetadata, Stage, StageType, Transition};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Stages longer than this are stories (and podcast episodes)
pub const STORY_DURATION_THRESHOLD_MS: u64 = 30_000;

type GraphResult<T> = std::result::Result<T, GraphIntegrityError>;

/// Index of a stage inside its [`StageArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StageId(usize);

impl StageId {
    /// Position in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// Arena owning every stage and action of one pack
#[derive(Debug, Clone, Default)]
pub struct StageArena {
    stages: Vec<Stage>,
    actions: Vec<Action>,
    stage_index: HashMap<String, StageId>,
    action_index: HashMap<String, usize>,
}

impl StageArena {
    /// Build an arena, indexing stages by uuid and actions by id
    pub fn new(stages: Vec<Stage>, actions: Vec<Action>) -> Self {
        let mut stage_index = HashMap::with_capacity(stages.len());
        for (i, stage) in stages.iter().enumerate() {
            if stage_index.insert(stage.uuid.clone(), StageId(i)).is_some() {
                warn!(stage = %stage.uuid, "Duplicate stage uuid, later stage wins");
            }
        }

        let mut action_index = HashMap::with_capacity(actions.len());
        for (i, action) in actions.iter().enumerate() {
            if action_index.insert(action.id.clone(), i).is_some() {
                warn!(action = %action.id, "Duplicate action id, later action wins");
            }
        }

        Self {
            stages,
            actions,
            stage_index,
            action_index,
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Every stage id, in load order
    pub fn ids(&self) -> impl Iterator<Item = StageId> {
        (0..self.stages.len()).map(StageId)
    }

    /// Stage behind an id minted by this arena
    pub fn stage(&self, id: StageId) -> &Stage {
        &self.stages[id.0]
    }

    pub fn stage_id(&self, uuid: &str) -> GraphResult<StageId> {
        self.stage_index
            .get(uuid)
            .copied()
            .ok_or_else(|| GraphIntegrityError::StageNotFound(uuid.to_string()))
    }

    pub fn action(&self, id: &str) -> GraphResult<&Action> {
        self.action_index
            .get(id)
            .map(|&i| &self.actions[i])
            .ok_or_else(|| GraphIntegrityError::ActionNotFound(id.to_string()))
    }

    /// All options of an action, as stage ids
    pub fn resolve_action(&self, action_id: &str) -> GraphResult<Vec<StageId>> {
        let action = self.action(action_id)?;
        if action.options.is_empty() {
            return Err(GraphIntegrityError::EmptyAction(action_id.to_string()));
        }
        action
            .options
            .iter()
            .map(|uuid| self.stage_id(uuid))
            .collect()
    }

    /// Candidate stages of a transition; a stage shortcut yields exactly one
    pub fn resolve(&self, transition: &Transition) -> GraphResult<Vec<StageId>> {
        match transition {
            Transition::Stage { uuid } => Ok(vec![self.stage_id(uuid)?]),
            Transition::Action { action_id, .. } => self.resolve_action(action_id),
        }
    }

    /// First action listing the stage among its options
    pub fn action_listing(&self, uuid: &str) -> Option<&Action> {
        self.actions
            .iter()
            .find(|action| action.options.iter().any(|o| o == uuid))
    }

    pub(crate) fn set_home_transition(&mut self, id: StageId, transition: Transition) {
        self.stages[id.0].home_transition = Some(transition);
    }
}

/// Query surface shared by both pack schemas
pub trait StageGraphQuery {
    /// Backing arena
    fn arena(&self) -> &StageArena;

    /// Designated entry stage of the pack
    fn start(&self) -> GraphResult<StageId>;

    /// Whether the stage is story content (as opposed to menus/covers)
    fn is_story(&self, id: StageId) -> bool;

    /// Whether podcast-mode extraction is meaningful for this schema
    fn supports_podcast(&self) -> bool {
        false
    }

    fn stages(&self) -> &[Stage] {
        self.arena().stages()
    }

    fn actions(&self) -> &[Action] {
        self.arena().actions()
    }

    fn stage(&self, id: StageId) -> &Stage {
        self.arena().stage(id)
    }

    fn stage_id(&self, uuid: &str) -> GraphResult<StageId> {
        self.arena().stage_id(uuid)
    }

    /// Candidates behind the stage's ok transition, empty if it has none
    fn next_from(&self, id: StageId) -> GraphResult<Vec<StageId>> {
        match &self.stage(id).ok_transition {
            Some(transition) => self.arena().resolve(transition),
            None => Ok(Vec::new()),
        }
    }

    /// Candidates behind the stage's home transition, empty if it has none
    fn home_from(&self, id: StageId) -> GraphResult<Vec<StageId>> {
        match &self.stage(id).home_transition {
            Some(transition) => self.arena().resolve(transition),
            None => Ok(Vec::new()),
        }
    }

    /// Stage is a real choice: listed by an action with more than one option
    fn is_option_stage(&self, id: StageId) -> bool {
        let uuid = &self.stage(id).uuid;
        self.actions()
            .iter()
            .any(|action| action.options.len() > 1 && action.options.iter().any(|o| o == uuid))
    }

    /// Stage name with editor boilerplate stripped, `None` if nothing is left
    fn clean_display_name(&self, id: StageId) -> Option<String> {
        self.stage(id)
            .name
            .as_deref()
            .map(clean_display_name)
            .filter(|name| !name.is_empty())
    }

    fn can_go_home(&self, id: StageId) -> bool {
        self.stage(id).can_go_home()
    }

    /// Non-story stage whose ok transition leads into `id`
    fn entry_stage(&self, id: StageId) -> Option<StageId> {
        let action = self.arena().action_listing(&self.stage(id).uuid)?;
        self.arena().ids().find(|&candidate| {
            candidate != id
                && !self.is_story(candidate)
                && self
                    .stage(candidate)
                    .ok_transition
                    .as_ref()
                    .and_then(Transition::action_id)
                    == Some(action.id.as_str())
        })
    }

    /// Image shown for a story: its own, else the first one found walking
    /// back through the stages leading into it
    fn story_image(&self, id: StageId) -> Option<&str> {
        let mut visited = HashSet::new();
        let mut current = id;
        loop {
            if !visited.insert(current) {
                return None;
            }
            if let Some(image) = self.stage(current).image.as_deref() {
                return Some(image);
            }
            current = self.entry_stage(current)?;
        }
    }

    /// Name shown for a story; editor placeholders defer to the stage
    /// leading into it
    fn story_name(&self, id: StageId) -> Option<String> {
        match self.clean_display_name(id) {
            Some(name) if !is_boilerplate_name(&name) => Some(name),
            _ => self
                .entry_stage(id)
                .and_then(|entry| self.clean_display_name(entry)),
        }
    }

    /// Name shown for any stage
    fn stage_name(&self, id: StageId) -> Option<String> {
        if self.is_story(id) {
            self.story_name(id)
        } else {
            self.clean_display_name(id)
        }
    }

    /// Every story stage, sorted by name
    fn playing_stories(&self) -> Vec<StageId> {
        let mut stories: Vec<(String, StageId)> = self
            .arena()
            .ids()
            .filter(|&id| self.is_story(id))
            .map(|id| (self.stage(id).name.clone().unwrap_or_default(), id))
            .collect();
        stories.sort_by(|a, b| a.0.cmp(&b.0));
        stories.into_iter().map(|(_, id)| id).collect()
    }
}

/// Narrow a candidate set by a transition's option index
///
/// A valid index selects that single candidate. Otherwise an autoplay first
/// candidate is returned alone (automatic continuation), and anything else
/// yields the full set.
pub fn map_of_stages_for_option<G: StageGraphQuery + ?Sized>(
    graph: &G,
    mut candidates: Vec<StageId>,
    option_index: Option<usize>,
) -> Vec<StageId> {
    if let Some(index) = option_index {
        if index < candidates.len() {
            return vec![candidates[index]];
        }
    }
    if candidates
        .first()
        .is_some_and(|&first| graph.stage(first).control_settings.autoplay)
    {
        candidates.truncate(1);
    }
    candidates
}

/// Stage graph of one loaded pack
#[derive(Debug, Clone)]
pub enum StageGraph {
    Studio(StudioGraph),
    Telmi(TelmiGraph),
}

impl StageGraph {
    /// Parse a studio `story.json` document
    pub fn from_studio_json(json: &str) -> crate::Result<(PackMetadata, Self)> {
        let (metadata, graph) = StudioGraph::from_json(json)?;
        Ok((metadata, Self::Studio(graph)))
    }

    /// Parse a Telmi `nodes.json` document
    pub fn from_telmi_json(json: &str) -> crate::Result<Self> {
        Ok(Self::Telmi(TelmiGraph::from_json(json)?))
    }

    pub fn kind(&self) -> PackKind {
        match self {
            StageGraph::Studio(_) => PackKind::Studio,
            StageGraph::Telmi(_) => PackKind::Telmi,
        }
    }

    pub(crate) fn arena_mut(&mut self) -> &mut StageArena {
        match self {
            StageGraph::Studio(graph) => graph.arena_mut(),
            StageGraph::Telmi(graph) => graph.arena_mut(),
        }
    }
}

impl StageGraphQuery for StageGraph {
    fn arena(&self) -> &StageArena {
        match self {
            StageGraph::Studio(graph) => graph.arena(),
            StageGraph::Telmi(graph) => graph.arena(),
        }
    }

    fn start(&self) -> GraphResult<StageId> {
        match self {
            StageGraph::Studio(graph) => graph.start(),
            StageGraph::Telmi(graph) => graph.start(),
        }
    }

    fn is_story(&self, id: StageId) -> bool {
        match self {
            StageGraph::Studio(graph) => graph.is_story(id),
            StageGraph::Telmi(graph) => graph.is_story(id),
        }
    }

    fn supports_podcast(&self) -> bool {
        match self {
            StageGraph::Studio(graph) => graph.supports_podcast(),
            StageGraph::Telmi(graph) => graph.supports_podcast(),
        }
    }
}

impl From<StudioGraph> for StageGraph {
    fn from(graph: StudioGraph) -> Self {
        Self::Studio(graph)
    }
}

impl From<TelmiGraph> for StageGraph {
    fn from(graph: TelmiGraph) -> Self {
        Self::Telmi(graph)
    }
}

/// Stage type tag treated as story content by the studio schema
pub(crate) fn is_story_type(stage: &Stage) -> bool {
    stage.stage_type == StageType::Story
}
