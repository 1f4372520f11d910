//! Loading one unpacked pack folder

use crate::error::{Result, StorageError};
use conty_core::graph::{StageGraph, StageGraphQuery};
use conty_core::{ContyError, LoadedPack, Pack, PackKind, PackMetadata};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Telmi packs keep their metadata beside `nodes.json`
pub const TELMI_METADATA_FILE: &str = "metadata.json";

/// A thumbnail shipped next to the data file overrides the declared one
pub const THUMBNAIL_FILE: &str = "thumbnail.png";

/// Recognize the schema of an unpacked pack folder
pub async fn detect_kind(folder: &Path) -> Result<PackKind> {
    for kind in [PackKind::Telmi, PackKind::Studio] {
        if fs::try_exists(folder.join(kind.data_file())).await? {
            return Ok(kind);
        }
    }
    Err(StorageError::UnknownFormat(folder.display().to_string()))
}

/// Load metadata and stage graph of the pack stored in `folder`
///
/// Fails if the folder is missing, holds no known data file, or the graph
/// has no resolvable start stage. Other dangling references are left for
/// the consumers to handle.
pub async fn load_pack_folder(id: &str, folder: &Path) -> Result<LoadedPack> {
    if !fs::try_exists(folder).await? {
        return Err(StorageError::not_found("pack", id));
    }

    let kind = detect_kind(folder).await?;
    let data = fs::read_to_string(folder.join(kind.data_file())).await?;

    let (mut metadata, graph) = match kind {
        PackKind::Studio => StageGraph::from_studio_json(&data)?,
        PackKind::Telmi => {
            let metadata = read_telmi_metadata(folder).await?;
            (metadata, StageGraph::from_telmi_json(&data)?)
        }
    };

    if fs::try_exists(folder.join(THUMBNAIL_FILE)).await? {
        metadata.thumbnail = Some(THUMBNAIL_FILE.to_string());
    }

    let start = graph.start().map_err(ContyError::from)?;
    info!(
        pack = id,
        ?kind,
        stages = graph.stages().len(),
        actions = graph.actions().len(),
        start = %graph.stage(start).uuid,
        "Loaded pack"
    );

    Ok(LoadedPack {
        pack: Pack::new(id, kind, folder, metadata),
        graph,
    })
}

async fn read_telmi_metadata(folder: &Path) -> Result<PackMetadata> {
    let path = folder.join(TELMI_METADATA_FILE);
    if !fs::try_exists(&path).await? {
        debug!(folder = %folder.display(), "Telmi pack without metadata file");
        return Ok(PackMetadata::default());
    }
    let text = fs::read_to_string(&path).await?;
    Ok(serde_json::from_str(&text)?)
}
