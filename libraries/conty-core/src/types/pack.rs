/// Pack types
use crate::graph::StageGraph;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// On-disk schema of a pack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackKind {
    /// Studio export: `story.json`, flat uuid-linked arrays, assets under `assets/`
    Studio,

    /// Telmi pack: `nodes.json`, key-indexed maps, `audios/` and `images/`
    Telmi,
}

impl PackKind {
    /// Name of the graph file inside the pack folder
    pub fn data_file(&self) -> &'static str {
        match self {
            PackKind::Studio => "story.json",
            PackKind::Telmi => "nodes.json",
        }
    }

    /// Folder holding audio assets
    pub fn audio_dir(&self) -> &'static str {
        match self {
            PackKind::Studio => "assets",
            PackKind::Telmi => "audios",
        }
    }

    /// Folder holding image assets
    pub fn image_dir(&self) -> &'static str {
        match self {
            PackKind::Studio => "assets",
            PackKind::Telmi => "images",
        }
    }
}

/// Descriptive pack metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PackMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub format: Option<String>,
    pub version: Option<u32>,
    pub age: Option<u32>,
    /// Thumbnail file, relative to the pack folder
    pub thumbnail: Option<String>,
    pub keywords: Option<String>,
    pub subtitle: Option<String>,
    pub night_mode_available: bool,
}

/// An unpacked pack on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pack {
    pub id: String,
    pub kind: PackKind,
    pub folder: PathBuf,
    pub metadata: PackMetadata,
}

impl Pack {
    /// Create a pack rooted at `folder`
    pub fn new(
        id: impl Into<String>,
        kind: PackKind,
        folder: impl Into<PathBuf>,
        metadata: PackMetadata,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            folder: folder.into(),
            metadata,
        }
    }

    /// Display title, falling back to the pack id
    pub fn title(&self) -> &str {
        self.metadata.title.as_deref().unwrap_or(&self.id)
    }

    /// Resolve an audio asset reference to a file path
    pub fn audio_path(&self, asset: &str) -> PathBuf {
        self.folder.join(self.kind.audio_dir()).join(asset)
    }

    /// Resolve an image asset reference to a file path
    pub fn image_path(&self, asset: &str) -> PathBuf {
        self.folder.join(self.kind.image_dir()).join(asset)
    }

    /// Pack thumbnail path, if one is declared
    pub fn thumbnail_path(&self) -> Option<PathBuf> {
        self.metadata
            .thumbnail
            .as_deref()
            .map(|thumbnail| self.folder.join(thumbnail))
    }

    /// Pack folder
    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

/// A pack together with its freshly loaded stage graph
#[derive(Debug, Clone)]
pub struct LoadedPack {
    pub pack: Pack,
    pub graph: StageGraph,
}
