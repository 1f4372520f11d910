/// Stage, action and transition types
use serde::{Deserialize, Serialize};

/// Editor classification of a studio stage
///
/// Telmi packs carry no type tag; their stages are all `Stage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StageType {
    #[default]
    #[serde(rename = "stage")]
    Stage,
    #[serde(rename = "story")]
    Story,
    #[serde(rename = "cover")]
    Cover,
    #[serde(rename = "menu.questionstage")]
    MenuQuestionStage,
    #[serde(rename = "menu.optionstage")]
    MenuOptionStage,
    #[serde(rename = "menu.questionaction")]
    MenuQuestionAction,
    #[serde(rename = "menu.optionaction")]
    MenuOptionAction,
    #[serde(rename = "story.action")]
    StoryAction,
    #[serde(rename = "action")]
    Action,
}

impl StageType {
    /// Parse an editor tag, mapping anything unknown to `Stage`
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "story" => Self::Story,
            "cover" => Self::Cover,
            "menu.questionstage" => Self::MenuQuestionStage,
            "menu.optionstage" => Self::MenuOptionStage,
            "menu.questionaction" => Self::MenuQuestionAction,
            "menu.optionaction" => Self::MenuOptionAction,
            "story.action" => Self::StoryAction,
            "action" => Self::Action,
            _ => Self::Stage,
        }
    }
}

/// Which physical controls are live while a stage is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// Stage is one option of a selectable menu
    pub wheel: bool,
    /// OK button moves on
    pub ok: bool,
    /// Home button moves back
    pub home: bool,
    /// Playback can be paused
    pub pause: bool,
    /// Move on automatically once the audio ends
    pub autoplay: bool,
}

/// Edge from a stage to its successor candidates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Route through an action, optionally pre-selecting one option
    Action {
        action_id: String,
        option_index: Option<usize>,
    },

    /// Direct shortcut to a stage (home transitions only)
    Stage { uuid: String },
}

impl Transition {
    /// Transition through an action
    pub fn action(action_id: impl Into<String>, option_index: Option<usize>) -> Self {
        Self::Action {
            action_id: action_id.into(),
            option_index,
        }
    }

    /// Option index carried by the transition, if any
    pub fn option_index(&self) -> Option<usize> {
        match self {
            Self::Action { option_index, .. } => *option_index,
            Self::Stage { .. } => None,
        }
    }

    /// Action routed through, if any
    pub fn action_id(&self) -> Option<&str> {
        match self {
            Self::Action { action_id, .. } => Some(action_id),
            Self::Stage { .. } => None,
        }
    }
}

/// A graph node: one playable unit (image/audio + controls)
///
/// `uuid` is the only identity; equality of two stages is decided by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub uuid: String,
    pub stage_type: StageType,
    pub name: Option<String>,
    pub image: Option<String>,
    pub audio: Option<String>,
    pub control_settings: ControlSettings,
    pub ok_transition: Option<Transition>,
    pub home_transition: Option<Transition>,
    pub is_start: bool,
    /// Explicit audio length in milliseconds
    pub duration_ms: Option<u64>,
    /// Podcast ordinal
    pub episode: Option<u32>,
}

impl Stage {
    /// Create a bare stage with default controls and no edges
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            stage_type: StageType::Stage,
            name: None,
            image: None,
            audio: None,
            control_settings: ControlSettings::default(),
            ok_transition: None,
            home_transition: None,
            is_start: false,
            duration_ms: None,
            episode: None,
        }
    }

    /// Home button is live and leads somewhere
    pub fn can_go_home(&self) -> bool {
        self.control_settings.home && self.home_transition.is_some()
    }
}

impl PartialEq for Stage {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl Eq for Stage {}

/// An ordered branch point listing candidate stage uuids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub name: Option<String>,
    pub options: Vec<String>,
}

impl Action {
    /// Create an action over the given stage uuids
    pub fn new<I, S>(id: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: None,
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Position of a stage among the options
    pub fn position_of(&self, uuid: &str) -> Option<usize> {
        self.options.iter().position(|o| o == uuid)
    }
}
