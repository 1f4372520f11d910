mod pack;
mod stage;
mod story;

pub use pack::{LoadedPack, Pack, PackKind, PackMetadata};
pub use stage::{Action, ControlSettings, Stage, StageType, Transition};
pub use story::Story;
