//! Library of unpacked packs under one root directory

use crate::error::{Result, StorageError};
use crate::folder::{detect_kind, load_pack_folder};
use async_trait::async_trait;
use conty_core::{LoadedPack, Pack, PackRepository};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;
use tracing::{debug, warn};

/// Pack repository where each pack is a sub-folder named by its id
#[derive(Debug)]
pub struct FolderPackRepository {
    root: PathBuf,
    open: Mutex<HashSet<String>>,
}

impl FolderPackRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            open: Mutex::new(HashSet::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder of a pack; ids must be a single plain path component
    pub fn pack_folder(&self, pack_id: &str) -> Result<PathBuf> {
        let mut components = Path::new(pack_id).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(pack_id)),
            _ => Err(StorageError::InvalidId(pack_id.to_string())),
        }
    }

    /// Every loadable pack in the library, sorted by id
    ///
    /// Folders that fail to load are skipped with a warning.
    pub async fn list_packs(&self) -> Result<Vec<Pack>> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut packs = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let Some(id) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if detect_kind(&entry.path()).await.is_err() {
                continue;
            }
            match load_pack_folder(&id, &entry.path()).await {
                Ok(loaded) => packs.push(loaded.pack),
                Err(err) => warn!(pack = %id, %err, "Skipping unreadable pack"),
            }
        }

        packs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(packs)
    }

    /// Ids of the packs loaded and not yet released
    pub fn open_packs(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .open
            .lock()
            .map(|open| open.iter().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }
}

#[async_trait]
impl PackRepository for FolderPackRepository {
    async fn load_pack(&self, pack_id: &str) -> conty_core::Result<LoadedPack> {
        let folder = self.pack_folder(pack_id)?;
        let loaded = load_pack_folder(pack_id, &folder).await?;
        if let Ok(mut open) = self.open.lock() {
            open.insert(pack_id.to_string());
        }
        Ok(loaded)
    }

    fn release_pack(&self, pack: &Pack) {
        if let Ok(mut open) = self.open.lock() {
            open.remove(&pack.id);
        }
        debug!(pack = %pack.id, "Released pack");
    }
}
